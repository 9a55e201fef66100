/*!
 * Copyright (c) 2026 Ming Lyu, aka mingcheng
 *
 * This source code is licensed under the MIT License,
 * which is located in the LICENSE file in the source tree's root directory.
 *
 * File: delivery_methods.rs
 * Author: mingcheng <mingcheng@apache.org>
 * File Created: 2026-10-14 14:02:55
 *
 * Modified By: mingcheng <mingcheng@apache.org>
 * Last Modified: 2026-10-16 09:41:12
 */

use crate::address;
use crate::error::Result;
use crate::message::{AddressField, OutboundMessage};
use crate::request::DeliveryResult;
use crate::sendgrid_delivery::check_delivery_params;
use crate::traits::DeliveryMethod;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// A delivery method that keeps every delivered message in memory.
#[derive(Default)]
pub struct MemoryDelivery {
    deliveries: Mutex<Vec<OutboundMessage>>,
}

impl MemoryDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, oldest first.
    pub async fn deliveries(&self) -> Vec<OutboundMessage> {
        self.deliveries.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.deliveries.lock().await.clear();
    }
}

#[async_trait]
impl DeliveryMethod for MemoryDelivery {
    async fn deliver(&self, message: &mut OutboundMessage) -> Result<DeliveryResult> {
        check_delivery_params(message)?;
        self.deliveries.lock().await.push(message.clone());
        Ok(DeliveryResult::success("success"))
    }
}

/// A delivery method that appends a log entry per message to a local file.
pub struct FileDelivery {
    file_path: String,
    // Use a mutex to prevent concurrent writes to the same file from multiple tasks
    lock: Arc<Mutex<()>>,
}

impl FileDelivery {
    pub fn new(file_path: String) -> Self {
        Self {
            file_path,
            lock: Arc::new(Mutex::new(())),
        }
    }

    fn addresses(field: Option<&AddressField>) -> Result<String> {
        let addresses = field
            .map(address::bare_addresses)
            .transpose()?
            .unwrap_or_default();
        Ok(addresses.join(", "))
    }
}

#[async_trait]
impl DeliveryMethod for FileDelivery {
    async fn deliver(&self, message: &mut OutboundMessage) -> Result<DeliveryResult> {
        check_delivery_params(message)?;
        let from = Self::addresses(message.from.as_ref())?;
        let to = Self::addresses(message.to.as_ref())?;

        let _guard = self.lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .await
            .map_err(anyhow::Error::from)?;

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let log_entry = format!(
            "[{}] Delivered message from {} to {}: {}\n",
            timestamp,
            from,
            to,
            message.subject.as_deref().unwrap_or_default()
        );

        file.write_all(log_entry.as_bytes())
            .await
            .map_err(anyhow::Error::from)?;
        info!("Message from {} written to {}", from, self.file_path);
        Ok(DeliveryResult::success("success"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ValidationError};
    use std::env;
    use tokio::fs;

    fn test_message() -> OutboundMessage {
        OutboundMessage {
            from: Some(AddressField::from("Jane <jane@x.com>")),
            to: Some(AddressField::from("a@x.com, b@x.com")),
            subject: Some("Weekly report".to_string()),
            text_part: Some("All good".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_memory_delivery_records_messages() {
        let delivery = MemoryDelivery::new();
        let mut message = test_message();

        let result = delivery.deliver(&mut message).await.unwrap();
        assert!(!result.is_error());

        let deliveries = delivery.deliveries().await;
        assert_eq!(deliveries, vec![test_message()]);

        delivery.clear().await;
        assert!(delivery.deliveries().await.is_empty());
    }

    #[tokio::test]
    async fn test_memory_delivery_validates() {
        let delivery = MemoryDelivery::new();
        let mut message = OutboundMessage {
            text_part: None,
            ..test_message()
        };

        let result = delivery.deliver(&mut message).await;
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::MissingBody))
        ));
        assert!(delivery.deliveries().await.is_empty());
    }

    #[tokio::test]
    async fn test_file_delivery() {
        let temp_dir = env::temp_dir();
        let file_path = temp_dir.join("test_file_delivery.log");
        let file_path_str = file_path.to_str().unwrap().to_string();

        // Ensure file doesn't exist before test
        let _ = fs::remove_file(&file_path).await;

        let delivery = FileDelivery::new(file_path_str);
        let mut message = test_message();

        let result = delivery.deliver(&mut message).await;
        assert!(result.is_ok());

        let contents = fs::read_to_string(&file_path).await.unwrap();
        assert!(
            contents.contains("Delivered message from jane@x.com to a@x.com, b@x.com: Weekly report")
        );

        let _ = fs::remove_file(&file_path).await;
    }
}
