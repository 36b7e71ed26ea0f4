//! The two endpoints the widget talks to, and how their replies are read.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ConfiguratorError, Result};
use crate::types::{CartLineItem, LogoMode, UploadedLogo};
use crate::upload::LogoFile;

#[async_trait(?Send)]
pub trait Backend {
    type File: LogoFile;

    /// `POST` the logo and processing mode as multipart form data.
    async fn upload_logo(&self, file: &Self::File, mode: LogoMode) -> Result<UploadedLogo>;

    /// `POST` the line item as JSON; returns the new cart count.
    async fn add_to_cart(&self, item: &CartLineItem) -> Result<u32>;
}

#[derive(Deserialize)]
struct UploadReply {
    #[serde(default)]
    error: Option<String>,
    processed_url: Option<String>,
    filename: Option<String>,
    original_url: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    mode: Option<String>,
}

#[derive(Deserialize)]
struct CartReply {
    #[serde(default)]
    error: Option<String>,
    cart_count: Option<u32>,
}

/// Any non-empty `error` wins over the other fields.
pub fn parse_upload_reply(body: &str) -> Result<UploadedLogo> {
    let reply: UploadReply = serde_json::from_str(body)
        .map_err(|e| ConfiguratorError::MalformedResponse(format!("upload reply: {}", e)))?;
    if let Some(msg) = reply.error.filter(|m| !m.is_empty()) {
        return Err(ConfiguratorError::Server(msg));
    }
    match (reply.processed_url, reply.filename) {
        (Some(processed_url), Some(filename)) => Ok(UploadedLogo {
            processed_url,
            filename,
            original_url: reply.original_url,
            width: reply.width,
            height: reply.height,
            mode: reply.mode.as_deref().map(LogoMode::from_value),
        }),
        _ => Err(ConfiguratorError::MalformedResponse("upload reply lacks processed_url or filename".to_string())),
    }
}

pub fn parse_cart_reply(body: &str) -> Result<u32> {
    let reply: CartReply = serde_json::from_str(body)
        .map_err(|e| ConfiguratorError::MalformedResponse(format!("cart reply: {}", e)))?;
    if let Some(msg) = reply.error.filter(|m| !m.is_empty()) {
        return Err(ConfiguratorError::Server(msg));
    }
    reply
        .cart_count
        .ok_or_else(|| ConfiguratorError::MalformedResponse("cart reply lacks cart_count".to_string()))
}
