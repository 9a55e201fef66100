/*!
 * Copyright (c) 2026 Ming Lyu, aka mingcheng
 *
 * This source code is licensed under the MIT License,
 * which is located in the LICENSE file in the source tree's root directory.
 *
 * File: dispatch.rs
 * Author: mingcheng <mingcheng@apache.org>
 * File Created: 2026-10-14 16:30:08
 *
 * Modified By: mingcheng <mingcheng@apache.org>
 * Last Modified: 2026-10-16 11:02:47
 */

use crate::config::{AppConfig, DeliveryMethodConfig};
use crate::delivery_methods::{FileDelivery, MemoryDelivery};
use crate::error::{Error, Result};
use crate::message::OutboundMessage;
use crate::request::DeliveryResult;
use crate::sendgrid_delivery::SendgridDelivery;
use crate::traits::DeliveryMethod;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Delivery methods known by name, with one of them used by default.
pub struct DeliveryMethods {
    methods: HashMap<String, Arc<dyn DeliveryMethod>>,
    default_method: String,
}

impl DeliveryMethods {
    pub fn new(default_method: impl Into<String>) -> Self {
        Self {
            methods: HashMap::new(),
            default_method: default_method.into(),
        }
    }

    /// Builds every configured method. A method that cannot be created fails
    /// the whole registry.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut methods = Self::new(config.delivery_method.clone());

        for method_config in &config.delivery_methods {
            let method: Arc<dyn DeliveryMethod> = match method_config {
                DeliveryMethodConfig::Sendgrid(settings) => {
                    Arc::new(SendgridDelivery::new(settings.clone())?)
                }
                DeliveryMethodConfig::Memory => Arc::new(MemoryDelivery::new()),
                DeliveryMethodConfig::File { file_path } => {
                    Arc::new(FileDelivery::new(file_path.clone()))
                }
            };
            methods.register(method_config.name(), method);
        }

        Ok(methods)
    }

    /// Registers `method` under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, method: Arc<dyn DeliveryMethod>) {
        self.methods.insert(name.into(), method);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn DeliveryMethod>> {
        self.methods
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownDeliveryMethod(name.to_string()))
    }

    pub fn default_method(&self) -> &str {
        &self.default_method
    }

    pub async fn deliver_with(
        &self,
        name: &str,
        message: &mut OutboundMessage,
    ) -> Result<DeliveryResult> {
        let method = self.get(name)?;
        debug!("Dispatching message through '{}'", name);
        method.deliver(message).await
    }

    /// Delivers through the default method.
    pub async fn deliver(&self, message: &mut OutboundMessage) -> Result<DeliveryResult> {
        self.deliver_with(&self.default_method, message).await
    }
}
