/*!
 * Copyright (c) 2026 Ming Lyu, aka mingcheng
 *
 * This source code is licensed under the MIT License,
 * which is located in the LICENSE file in the source tree's root directory.
 *
 * File: main.rs
 * Author: mingcheng <mingcheng@apache.org>
 * File Created: 2026-10-15 16:12:40
 *
 * Modified By: mingcheng <mingcheng@apache.org>
 * Last Modified: 2026-10-16 14:47:21
 */

use clap::Parser;
use log::{error, info};
use sendgrid_delivery::config::AppConfig;
use sendgrid_delivery::{AddressField, DeliveryMethods, OutboundMessage};
use std::io::Write;

struct MultiWriter {
    writers: Vec<Box<dyn Write + Send + 'static>>,
}

impl Write for MultiWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        for w in &mut self.writers {
            let _ = w.write(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        for w in &mut self.writers {
            let _ = w.flush();
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    config: Option<String>,

    /// Delivery method to use instead of the configured default
    #[arg(short, long)]
    method: Option<String>,

    #[arg(long)]
    from: String,

    /// Recipients, comma separated
    #[arg(long)]
    to: String,

    #[arg(long)]
    bcc: Option<String>,

    #[arg(long)]
    reply_to: Option<String>,

    #[arg(short, long)]
    subject: Option<String>,

    #[arg(long)]
    text: Option<String>,

    #[arg(long)]
    html: Option<String>,

    /// Extra header as "Name: value", may be repeated
    #[arg(long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected \"Name: value\", got {:?}", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing header name in {:?}", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn build_message(args: &Args) -> OutboundMessage {
    let mut message = OutboundMessage {
        from: Some(AddressField::from(args.from.as_str())),
        to: Some(AddressField::from(args.to.as_str())),
        bcc: args.bcc.as_deref().map(AddressField::from),
        reply_to: args.reply_to.as_deref().map(AddressField::from),
        subject: args.subject.clone(),
        text_part: args.text.clone(),
        html_part: args.html.clone(),
        headers: Vec::new(),
    };

    for (name, value) in &args.headers {
        message.add_header(name.as_str(), value.as_str());
    }

    message
}

fn initialize_logger(config: &AppConfig) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();

    if let Some(level) = &config.log_level {
        builder.parse_filters(level);
    } else if let Ok(env_level) = std::env::var("RUST_LOG") {
        builder.parse_filters(&env_level);
    } else {
        builder.filter_level(log::LevelFilter::Info);
    }

    if let Some(log_file) = &config.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {}", log_file, e))?;

        if config.quiet {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        } else {
            let multi_writer = MultiWriter {
                writers: vec![Box::new(file), Box::new(std::io::stderr())],
            };
            builder.target(env_logger::Target::Pipe(Box::new(multi_writer)));
        }
    } else if config.quiet {
        builder.target(env_logger::Target::Pipe(Box::new(std::io::sink())));
    }

    builder.init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::new_from_file(path),
        None => AppConfig::new(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Failed to load config: {:?}", e);
        if let Ok(path) = std::env::current_dir() {
            eprintln!("Current search path: {:?}", path);
        }
        eprintln!("Please create a `config.toml` or set APP_... environment variables, or specify a config file with --config.");
        std::process::exit(1);
    });

    initialize_logger(&config)?;

    let methods = DeliveryMethods::from_config(&config)?;
    let method = args
        .method
        .clone()
        .unwrap_or_else(|| methods.default_method().to_string());
    let mut message = build_message(&args);

    info!("Delivering message to {} via '{}'", args.to, method);

    match methods.deliver_with(&method, &mut message).await {
        Ok(result) => {
            info!("Delivered: {}", result.message);
            Ok(())
        }
        Err(e) => {
            error!("Delivery failed: {}", e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("X-Custom: 1"),
            Ok(("X-Custom".to_string(), "1".to_string()))
        );
        assert_eq!(
            parse_header("X-SMTPAPI: {\"category\": \"news\"}"),
            Ok((
                "X-SMTPAPI".to_string(),
                "{\"category\": \"news\"}".to_string()
            ))
        );
        assert!(parse_header("no separator").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn test_build_message() {
        let args = Args::parse_from([
            "sendgrid-delivery",
            "--from",
            "Jane <jane@x.com>",
            "--to",
            "a@x.com, b@x.com",
            "--text",
            "Hello",
            "--header",
            "X-Custom: 1",
        ]);

        let message = build_message(&args);

        assert_eq!(message.to, Some(AddressField::from("a@x.com, b@x.com")));
        assert_eq!(message.text_part.as_deref(), Some("Hello"));
        assert_eq!(message.header("X-Custom"), Some("1"));
        assert!(message.bcc.is_none());
    }
}
