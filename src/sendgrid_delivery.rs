/*!
 * Copyright (c) 2026 Ming Lyu, aka mingcheng
 *
 * This source code is licensed under the MIT License,
 * which is located in the LICENSE file in the source tree's root directory.
 *
 * File: sendgrid_delivery.rs
 * Author: mingcheng <mingcheng@apache.org>
 * File Created: 2026-10-13 13:40:19
 *
 * Modified By: mingcheng <mingcheng@apache.org>
 * Last Modified: 2026-10-16 10:18:03
 */

use crate::address;
use crate::config::SendgridSettings;
use crate::error::{DeliveryError, Result, ValidationError};
use crate::message::{OutboundMessage, is_blank};
use crate::request::{DeliveryRequest, DeliveryResult};
use crate::sendgrid_client::SendgridClient;
use crate::traits::{ApiClient, DeliveryMethod};
use async_trait::async_trait;
use lettre::message::Mailbox;
use log::{debug, error, info};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Routing header carrying provider instructions, passed through as is.
pub const ROUTING_HEADER: &str = "X-SMTPAPI";

// Set by the provider from the request itself.
const RESERVED_HEADERS: [&str; 5] = ["To", "From", "Bcc", "Subject", ROUTING_HEADER];
// Only reserved when the body is multipart/alternative.
const MULTIPART_HEADERS: [&str; 2] = ["Content-Type", "Mime-Version"];

// Factory trait
#[cfg_attr(test, mockall::automock)]
pub trait ApiClientFactory: Send + Sync {
    fn create(&self, settings: &SendgridSettings) -> anyhow::Result<Box<dyn ApiClient>>;
}

pub struct RealApiClientFactory;

impl ApiClientFactory for RealApiClientFactory {
    fn create(&self, settings: &SendgridSettings) -> anyhow::Result<Box<dyn ApiClient>> {
        Ok(Box::new(SendgridClient::new(settings)))
    }
}

#[cfg(test)]
#[path = "./sendgrid_delivery_tests.rs"]
mod sendgrid_delivery_tests;

/// Addresses resolved from a message before anything on it is touched.
#[derive(Debug)]
struct Addressing {
    to: Vec<Mailbox>,
    bcc: Option<Vec<String>>,
    from: Mailbox,
    reply_to: Option<String>,
}

/// Delivery method handing messages to the SendGrid Web API.
pub struct SendgridDelivery {
    settings: SendgridSettings,
    client: Box<dyn ApiClient>,
}

impl SendgridDelivery {
    pub fn new(settings: SendgridSettings) -> anyhow::Result<Self> {
        Self::new_with_factory(settings, Arc::new(RealApiClientFactory))
    }

    pub fn new_with_factory(
        settings: SendgridSettings,
        factory: Arc<dyn ApiClientFactory>,
    ) -> anyhow::Result<Self> {
        let client = factory.create(&settings)?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &SendgridSettings {
        &self.settings
    }

    fn resolve(message: &OutboundMessage) -> Result<Addressing, ValidationError> {
        let to = message
            .to
            .as_ref()
            .map(address::mailboxes)
            .transpose()?
            .unwrap_or_default();
        if to.is_empty() {
            return Err(ValidationError::MissingTo);
        }

        let bcc = message
            .bcc
            .as_ref()
            .map(address::bare_addresses)
            .transpose()?
            .filter(|bcc| !bcc.is_empty());

        let from = message
            .from
            .as_ref()
            .ok_or(ValidationError::MissingFrom)
            .and_then(address::single_mailbox)?;

        let reply_to = message
            .reply_to
            .as_ref()
            .map(address::bare_addresses)
            .transpose()?
            .filter(|reply_to| !reply_to.is_empty())
            .map(|reply_to| reply_to.join(", "));

        Ok(Addressing {
            to,
            bcc,
            from,
            reply_to,
        })
    }
}

/// Rejects messages without a sender, a recipient or any body content.
pub fn check_delivery_params(message: &OutboundMessage) -> Result<(), ValidationError> {
    if message.from.as_ref().is_none_or(|from| from.is_blank()) {
        return Err(ValidationError::MissingFrom);
    }
    if message.to.as_ref().is_none_or(|to| to.is_blank()) {
        return Err(ValidationError::MissingTo);
    }
    if message.has_blank_body() {
        return Err(ValidationError::MissingBody);
    }
    Ok(())
}

/// Fills in the headers the API needs on the message itself: `Return-Path`
/// (only when missing) from the sender, and `Reply-To` reduced to bare
/// addresses. Both stay visible on `message` after delivery.
fn apply_sender_headers(message: &mut OutboundMessage, from: &Mailbox, reply_to: Option<&str>) {
    if !message.has_header("Return-Path") {
        message.set_header("Return-Path", address::bare_address(from));
    }
    if let Some(reply_to) = reply_to {
        message.set_header("Reply-To", reply_to);
    }
}

fn is_multipart_alternative(message: &OutboundMessage) -> bool {
    message.header("Content-Type").is_some_and(|value| {
        value
            .trim_start()
            .to_ascii_lowercase()
            .starts_with("multipart/alternative")
    })
}

/// Header fields to forward, minus the ones the provider sets on its own.
pub fn header_map(message: &OutboundMessage) -> Map<String, Value> {
    let multipart = is_multipart_alternative(message);
    let reserved = |name: &str| {
        RESERVED_HEADERS
            .iter()
            .chain(MULTIPART_HEADERS.iter().filter(|_| multipart))
            .any(|candidate| candidate.eq_ignore_ascii_case(name))
    };

    let mut map = Map::new();
    for field in message.headers.iter().filter(|field| !reserved(&field.name)) {
        map.insert(field.name.clone(), Value::String(field.value.clone()));
    }
    map
}

fn non_blank(value: Option<&str>) -> Option<String> {
    (!is_blank(value)).then(|| value.unwrap_or_default().to_string())
}

fn build_request(message: &OutboundMessage, addressing: Addressing) -> DeliveryRequest {
    let Addressing { to, bcc, from, .. } = addressing;

    DeliveryRequest {
        toname: to.iter().map(address::display_name).collect(),
        to: to.iter().map(address::bare_address).collect(),
        from: address::bare_address(&from),
        fromname: address::display_name(&from),
        bcc,
        subject: non_blank(message.subject.as_deref()),
        text: non_blank(message.text_part.as_deref()),
        html: non_blank(message.html_part.as_deref()),
        headers: Value::Object(header_map(message)).to_string(),
        x_smtpapi: message.header(ROUTING_HEADER).map(str::to_string),
    }
}

#[async_trait]
impl DeliveryMethod for SendgridDelivery {
    async fn deliver(&self, message: &mut OutboundMessage) -> Result<DeliveryResult> {
        check_delivery_params(message)?;

        // Everything is parsed up front so a rejected message is left untouched
        let addressing = Self::resolve(message)?;
        apply_sender_headers(message, &addressing.from, addressing.reply_to.as_deref());

        let request = build_request(message, addressing);
        debug!(
            "Delivering message from {} to {} recipient(s)",
            request.from,
            request.to.len()
        );

        let result = self.client.queue(&request).await?;
        if result.is_error() {
            error!("SendGrid rejected message from {}: {}", request.from, result.message);
            return Err(DeliveryError::new(result.message).into());
        }

        info!("Message from {} queued with SendGrid", request.from);
        Ok(result)
    }
}
