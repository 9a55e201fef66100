use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_delivery_method")]
    pub delivery_method: String,
    #[serde(default)]
    pub delivery_methods: Vec<DeliveryMethodConfig>,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
    #[serde(default)]
    pub quiet: bool,
}

/// One configured delivery method, registered under its `type` name.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DeliveryMethodConfig {
    Sendgrid(SendgridSettings),
    Memory,
    File { file_path: String },
}

impl DeliveryMethodConfig {
    pub fn name(&self) -> &'static str {
        match self {
            DeliveryMethodConfig::Sendgrid(_) => SENDGRID,
            DeliveryMethodConfig::Memory => MEMORY,
            DeliveryMethodConfig::File { .. } => FILE,
        }
    }
}

/// Credentials are opaque here and handed to the API client as they are.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct SendgridSettings {
    pub api_user: Option<String>,
    pub api_key: Option<String>,
    pub api_url: Option<String>,
}

pub const SENDGRID: &str = "sendgrid";
pub const MEMORY: &str = "memory";
pub const FILE: &str = "file";

pub const DEFAULT_API_URL: &str = "https://api.sendgrid.com";

fn default_delivery_method() -> String {
    SENDGRID.to_string()
}

// Implement loading configuration
impl AppConfig {
    // Load config from defaults, then file (if exists), then environment variables
    pub fn new() -> Result<Self, ConfigError> {
        Self::configure_defaults()?
            // Merge in config file if present
            .add_source(File::with_name("config").required(false))
            // e.g. APP_DELIVERY_METHOD=memory APP_LOG_LEVEL=debug
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }

    // Load config from a specific file path
    pub fn new_from_file(path: &str) -> Result<Self, ConfigError> {
        Self::configure_defaults()?
            .add_source(File::with_name(path).required(true))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn configure_defaults()
    -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder().set_default("delivery_method", SENDGRID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(toml_str: &str) -> Result<AppConfig, ConfigError> {
        AppConfig::configure_defaults()
            .unwrap()
            .add_source(File::from_str(toml_str, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
    }

    #[test]
    fn test_valid_config_deserialization() {
        let toml_str = r#"
            delivery_method = "sendgrid"
            log_level = "debug"

            [[delivery_methods]]
            type = "sendgrid"
            api_user = "user"
            api_key = "secret"

            [[delivery_methods]]
            type = "file"
            file_path = "/tmp/mail.log"
        "#;

        let config = parse(toml_str).unwrap();

        assert_eq!(config.delivery_method, "sendgrid");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.delivery_methods.len(), 2);
        assert_eq!(
            config.delivery_methods[0],
            DeliveryMethodConfig::Sendgrid(SendgridSettings {
                api_user: Some("user".to_string()),
                api_key: Some("secret".to_string()),
                api_url: None,
            })
        );
        assert_eq!(config.delivery_methods[1].name(), FILE);
    }

    #[test]
    fn test_default_values() {
        let config = parse(
            r#"
            [[delivery_methods]]
            type = "memory"
        "#,
        )
        .unwrap();

        assert_eq!(config.delivery_method, SENDGRID);
        assert_eq!(config.delivery_methods, vec![DeliveryMethodConfig::Memory]);
        assert!(!config.quiet);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_sendgrid_without_credentials() {
        let config = parse(
            r#"
            [[delivery_methods]]
            type = "sendgrid"
            api_url = "http://localhost:3000"
        "#,
        )
        .unwrap();

        assert_eq!(
            config.delivery_methods[0],
            DeliveryMethodConfig::Sendgrid(SendgridSettings {
                api_url: Some("http://localhost:3000".to_string()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_unknown_method_type() {
        let res = parse(
            r#"
            [[delivery_methods]]
            type = "carrier-pigeon"
        "#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_invalid_config_type() {
        let res = parse(
            r#"
            quiet = "loud"
        "#,
        );
        assert!(res.is_err());
    }
}
