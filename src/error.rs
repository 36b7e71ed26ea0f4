//! Error types for the configurator.

use thiserror::Error;
use wasm_bindgen::JsValue;

const PRODUCT_UNAVAILABLE: &str = "This product is unavailable. Please choose another.";

/// Where a failure came from. Selects the alert text and the log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally before any network call.
    Validation,
    /// The backend answered with an `error` field.
    Server,
    /// The request, the reply body, or an image load failed.
    Transport,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfiguratorError {
    #[error("Please upload a PNG, JPG, or SVG file.")]
    UnsupportedFileType(String),

    #[error("File is too large. Maximum size is {limit_mb}MB.")]
    FileTooLarge { size: f64, limit_mb: u64 },

    #[error("Please select a product and upload a logo.")]
    IncompleteDesign,

    #[error("{0}")]
    Server(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Image failed to load: {0}")]
    ImageLoad(String),

    #[error("Canvas error: {0}")]
    Canvas(String),

    #[error("Invalid product option: {0}")]
    InvalidProduct(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Missing element #{0}")]
    MissingElement(String),
}

impl ConfiguratorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFileType(_)
            | Self::FileTooLarge { .. }
            | Self::IncompleteDesign
            | Self::InvalidProduct(_)
            | Self::Config(_) => ErrorKind::Validation,
            Self::Server(_) => ErrorKind::Server,
            Self::Transport(_)
            | Self::MalformedResponse(_)
            | Self::ImageLoad(_)
            | Self::Canvas(_)
            | Self::MissingElement(_) => ErrorKind::Transport,
        }
    }

    /// Text to show the shopper. Transport failures get `fallback`, a
    /// broken product option gets a fixed notice, the rest carry their own
    /// message.
    pub fn alert_text(&self, fallback: &str) -> String {
        match self {
            Self::InvalidProduct(_) => PRODUCT_UNAVAILABLE.to_string(),
            _ if self.kind() == ErrorKind::Transport => fallback.to_string(),
            _ => self.to_string(),
        }
    }

    pub(crate) fn from_js(wrap: fn(String) -> Self, value: &JsValue) -> Self {
        let text = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        wrap(text)
    }
}

impl From<ConfiguratorError> for JsValue {
    fn from(err: ConfiguratorError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConfiguratorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn transport_errors_use_the_generic_alert() {
        let err = ConfiguratorError::Transport("connection reset".into());
        assert_eq!(err.alert_text("Failed to upload logo. Please try again."), "Failed to upload logo. Please try again.");
    }

    #[test]
    fn server_errors_surface_their_message() {
        let err = ConfiguratorError::Server("File type not allowed. Use PNG, JPG, or SVG.".into());
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.alert_text("generic"), "File type not allowed. Use PNG, JPG, or SVG.");
    }

    #[test]
    fn broken_product_options_get_a_shopper_notice() {
        let err = ConfiguratorError::InvalidProduct("option value \"mug\" is not an id".into());
        assert_eq!(err.alert_text("generic"), "This product is unavailable. Please choose another.");
        assert!(err.to_string().contains("\"mug\""));
    }

    #[test]
    fn size_limit_message_names_the_limit() {
        let err = ConfiguratorError::FileTooLarge { size: 6.0 * 1024.0 * 1024.0, limit_mb: 5 };
        assert_eq!(err.to_string(), "File is too large. Maximum size is 5MB.");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
