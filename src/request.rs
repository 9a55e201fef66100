/*!
 * Copyright (c) 2026 Ming Lyu, aka mingcheng
 *
 * This source code is licensed under the MIT License,
 * which is located in the LICENSE file in the source tree's root directory.
 *
 * File: request.rs
 * Author: mingcheng <mingcheng@apache.org>
 * File Created: 2026-10-12 14:20:36
 *
 * Modified By: mingcheng <mingcheng@apache.org>
 * Last Modified: 2026-10-15 11:37:54
 */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request handed to the API client for a single message.
///
/// Optional members are left out of the serialized form when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryRequest {
    pub to: Vec<String>,
    /// Display names, one per entry of `to`
    pub toname: Vec<Option<String>>,
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fromname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcc: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// JSON object of the extra headers to send along
    pub headers: String,
    /// Raw value of the `X-SMTPAPI` routing header
    #[serde(rename = "x-smtpapi", skip_serializing_if = "Option::is_none")]
    pub x_smtpapi: Option<String>,
}

impl DeliveryRequest {
    /// Decodes `headers` back into a map, mostly useful for inspection.
    pub fn header_map(&self) -> serde_json::Result<Map<String, Value>> {
        serde_json::from_str(&self.headers)
    }
}

/// What the provider answered for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub error: bool,
    pub message: String,
}

impl DeliveryResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            error: false,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error
    }
}
