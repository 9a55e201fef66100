/*!
 * Copyright (c) 2026 Ming Lyu, aka mingcheng
 *
 * This source code is licensed under the MIT License,
 * which is located in the LICENSE file in the source tree's root directory.
 *
 * File: sendgrid_client.rs
 * Author: mingcheng <mingcheng@apache.org>
 * File Created: 2026-10-13 09:12:44
 *
 * Modified By: mingcheng <mingcheng@apache.org>
 * Last Modified: 2026-10-15 15:06:27
 */

use crate::config::{DEFAULT_API_URL, SendgridSettings};
use crate::request::{DeliveryRequest, DeliveryResult};
use crate::traits::ApiClient;
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::Deserialize;

/// Client for the SendGrid Web API (`mail.send.json`).
pub struct SendgridClient {
    api_user: Option<String>,
    api_key: Option<String>,
    client: Client,
    api_url: String,
}

/// Body returned by `mail.send.json`, on success and failure alike.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    message: String,
    #[serde(default)]
    errors: Vec<String>,
}

impl From<ApiResponse> for DeliveryResult {
    fn from(response: ApiResponse) -> Self {
        if !response.errors.is_empty() {
            DeliveryResult::failure(response.errors.join(", "))
        } else if response.message == "error" {
            DeliveryResult::failure(response.message)
        } else {
            DeliveryResult::success(response.message)
        }
    }
}

impl SendgridClient {
    pub fn new(settings: &SendgridSettings) -> Self {
        Self {
            api_user: settings.api_user.clone(),
            api_key: settings.api_key.clone(),
            client: Client::new(),
            api_url: settings
                .api_url
                .clone()
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }

    fn form(&self, request: &DeliveryRequest) -> Vec<(&'static str, String)> {
        let mut form = Vec::new();

        if let Some(api_user) = &self.api_user {
            form.push(("api_user", api_user.clone()));
        }
        if let Some(api_key) = &self.api_key {
            form.push(("api_key", api_key.clone()));
        }

        for (address, name) in request.to.iter().zip(&request.toname) {
            form.push(("to[]", address.clone()));
            // toname[] must stay aligned with to[]
            form.push(("toname[]", name.clone().unwrap_or_default()));
        }
        form.push(("from", request.from.clone()));
        if let Some(fromname) = &request.fromname {
            form.push(("fromname", fromname.clone()));
        }
        for address in request.bcc.iter().flatten() {
            form.push(("bcc[]", address.clone()));
        }

        let optional = [
            ("subject", &request.subject),
            ("text", &request.text),
            ("html", &request.html),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                form.push((key, value.clone()));
            }
        }

        form.push(("headers", request.headers.clone()));
        if let Some(x_smtpapi) = &request.x_smtpapi {
            form.push(("x-smtpapi", x_smtpapi.clone()));
        }

        form
    }
}

#[async_trait]
impl ApiClient for SendgridClient {
    async fn queue(&self, request: &DeliveryRequest) -> anyhow::Result<DeliveryResult> {
        let url = format!("{}/api/mail.send.json", self.api_url);
        debug!("Queueing message for {} recipient(s)", request.to.len());

        let response = self
            .client
            .post(&url)
            .form(&self.form(request))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        let parsed: ApiResponse = serde_json::from_str(&text).map_err(|e| {
            error!("SendGrid API returned unexpected body: {} - {}", status, text);
            anyhow::anyhow!("Unexpected SendGrid API response ({}): {}", status, e)
        })?;

        Ok(parsed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn settings(api_url: String) -> SendgridSettings {
        SendgridSettings {
            api_user: Some("TEST_USER".to_string()),
            api_key: Some("TEST_KEY".to_string()),
            api_url: Some(api_url),
        }
    }

    fn request() -> DeliveryRequest {
        DeliveryRequest {
            to: vec!["a@x.com".to_string(), "b@x.com".to_string()],
            toname: vec![Some("Ann".to_string()), None],
            from: "jane@x.com".to_string(),
            fromname: Some("Jane".to_string()),
            bcc: Some(vec!["audit@x.com".to_string()]),
            subject: Some("Hello".to_string()),
            text: Some("Hi there".to_string()),
            html: None,
            headers: r#"{"X-Custom":"1"}"#.to_string(),
            x_smtpapi: Some(r#"{"category":["news"]}"#.to_string()),
        }
    }

    #[test]
    fn test_form_skips_absent_members() {
        let client = SendgridClient::new(&SendgridSettings::default());
        let form = client.form(&request());
        let keys: Vec<&str> = form.iter().map(|(key, _)| *key).collect();

        assert_eq!(
            keys,
            vec![
                "to[]",
                "toname[]",
                "to[]",
                "toname[]",
                "from",
                "fromname",
                "bcc[]",
                "subject",
                "text",
                "headers",
                "x-smtpapi",
            ]
        );
        assert_eq!(client.api_url, DEFAULT_API_URL);
    }

    #[tokio::test]
    async fn test_queue_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/mail.send.json")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_user".into(), "TEST_USER".into()),
                Matcher::UrlEncoded("api_key".into(), "TEST_KEY".into()),
                Matcher::UrlEncoded("from".into(), "jane@x.com".into()),
                Matcher::UrlEncoded("x-smtpapi".into(), r#"{"category":["news"]}"#.into()),
            ]))
            .with_status(200)
            .with_body(r#"{"message":"success"}"#)
            .create_async()
            .await;

        let client = SendgridClient::new(&settings(server.url()));
        let result = client.queue(&request()).await.unwrap();

        assert_eq!(result, DeliveryResult::success("success"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_queue_reports_provider_errors() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/mail.send.json")
            .with_status(400)
            .with_body(r#"{"message":"error","errors":["Bad username / password"]}"#)
            .create_async()
            .await;

        let client = SendgridClient::new(&settings(server.url()));
        let result = client.queue(&request()).await.unwrap();

        assert!(result.is_error());
        assert_eq!(result.message, "Bad username / password");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_queue_unexpected_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/mail.send.json")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let client = SendgridClient::new(&settings(server.url()));
        let result = client.queue(&request()).await;

        assert!(result.is_err());
        mock.assert_async().await;
    }
}
