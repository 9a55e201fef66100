use crate::error::Result;
use crate::message::OutboundMessage;
use crate::request::{DeliveryRequest, DeliveryResult};
use async_trait::async_trait;

/// A way of getting a composed message out of the door, selected by name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryMethod: Send + Sync {
    /// Delivers one message. Implementations may fill in headers on `message`.
    async fn deliver(&self, message: &mut OutboundMessage) -> Result<DeliveryResult>;
}

/// Client for the provider's mail API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Queues a request with the provider and reports its answer
    async fn queue(&self, request: &DeliveryRequest) -> anyhow::Result<DeliveryResult>;
}
