/*!
 * Copyright (c) 2026 Ming Lyu, aka mingcheng
 *
 * This source code is licensed under the MIT License,
 * which is located in the LICENSE file in the source tree's root directory.
 *
 * File: lib.rs
 * Author: mingcheng <mingcheng@apache.org>
 * File Created: 2026-10-12 09:55:10
 *
 * Modified By: mingcheng <mingcheng@apache.org>
 * Last Modified: 2026-10-16 11:05:33
 */

//! SendGrid Web API delivery method for composed mail messages.
//!
//! [`SendgridDelivery`] takes an [`OutboundMessage`], normalizes its addresses,
//! fills in `Return-Path`/`Reply-To` and hands a [`DeliveryRequest`] to an
//! [`ApiClient`]. [`DeliveryMethods`] picks a delivery method by its
//! configured name.

pub mod address;
pub mod config;
pub mod delivery_methods;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod request;
pub mod sendgrid_client;
pub mod sendgrid_delivery;
pub mod traits;

pub use dispatch::DeliveryMethods;
pub use error::{DeliveryError, Error, ValidationError};
pub use message::{AddressField, HeaderField, OutboundMessage};
pub use request::{DeliveryRequest, DeliveryResult};
pub use sendgrid_client::SendgridClient;
pub use sendgrid_delivery::SendgridDelivery;
pub use traits::{ApiClient, DeliveryMethod};
