/*!
 * Copyright (c) 2026 Ming Lyu, aka mingcheng
 *
 * This source code is licensed under the MIT License,
 * which is located in the LICENSE file in the source tree's root directory.
 *
 * File: error.rs
 * Author: mingcheng <mingcheng@apache.org>
 * File Created: 2026-10-12 10:04:51
 *
 * Modified By: mingcheng <mingcheng@apache.org>
 * Last Modified: 2026-10-14 17:22:09
 */

use thiserror::Error;

/// Errors returned by a delivery method.
#[derive(Debug, Error)]
pub enum Error {
    /// The message is missing a required part or carries an unusable address.
    /// Raised before any client call is made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The provider answered, but reported that it could not accept the message.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Failure raised by the client collaborator itself (network, malformed
    /// response, ...). Passed through untouched.
    #[error(transparent)]
    Client(#[from] anyhow::Error),

    #[error("unknown delivery method: {0}")]
    UnknownDeliveryMethod(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required mail part: from")]
    MissingFrom,

    #[error("missing required mail part: to")]
    MissingTo,

    #[error("missing required mail part: text or html body")]
    MissingBody,

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("from must resolve to exactly one address, got {0}")]
    AmbiguousSender(usize),
}

/// Failure reported by the provider, carrying its message verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct DeliveryError {
    message: String,
}

impl DeliveryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
