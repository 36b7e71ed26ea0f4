//! Runtime configuration, passed from JavaScript as a plain object.
//!
//! Every field has a default, so `new ProductConfigurator()` with no
//! argument mounts against the stock page markup.

use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::error::{ConfiguratorError, Result};
use crate::types::{LogoMode, PreviewFormat, SelectionStyle};

pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ConfiguratorConfig {
    pub upload_url: String,
    pub cart_url: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub viewport_margin: f64,
    pub logo_max_size: f64,
    pub reset_scale: f64,
    pub zoom_step: f64,
    pub zoom_out_step: f64,
    pub max_upload_bytes: u64,
    pub accepted_types: Vec<String>,
    pub background_color: String,
    pub currency_symbol: String,
    pub preview_format: PreviewFormat,
    pub preview_quality: f64,
    pub default_mode: LogoMode,
    pub cart_success_message: Option<String>,
    pub selection: SelectionStyle,
    pub elements: ElementIds,
}

impl Default for ConfiguratorConfig {
    fn default() -> Self {
        ConfiguratorConfig {
            upload_url: "/api/upload-logo".to_string(),
            cart_url: "/cart/add".to_string(),
            canvas_width: 500.0,
            canvas_height: 500.0,
            viewport_margin: 20.0,
            logo_max_size: 150.0,
            reset_scale: 0.5,
            zoom_step: 1.1,
            zoom_out_step: 0.9,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            accepted_types: ["image/png", "image/jpeg", "image/jpg", "image/svg+xml"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            background_color: "#f5f5f5".to_string(),
            currency_symbol: "$".to_string(),
            preview_format: PreviewFormat::Png,
            preview_quality: 0.8,
            default_mode: LogoMode::Bw,
            cart_success_message: Some("Added to cart!".to_string()),
            selection: SelectionStyle::default(),
            elements: ElementIds::default(),
        }
    }
}

/// Ids of the page elements the widget reads and writes.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ElementIds {
    pub canvas: String,
    pub product_select: String,
    pub size_group: String,
    pub size_select: String,
    pub quantity: String,
    pub unit_price: String,
    pub qty_display: String,
    pub total_price: String,
    pub add_to_cart: String,
    pub cart_count: String,
    pub upload_zone: String,
    pub file_input: String,
    pub logo_preview: String,
    pub logo_preview_img: String,
    pub mode_radio_name: String,
    pub reset_button: Option<String>,
    pub zoom_in_button: Option<String>,
    pub zoom_out_button: Option<String>,
    pub delete_button: Option<String>,
}

impl Default for ElementIds {
    fn default() -> Self {
        ElementIds {
            canvas: "preview-canvas".to_string(),
            product_select: "product-select".to_string(),
            size_group: "size-group".to_string(),
            size_select: "size-select".to_string(),
            quantity: "quantity".to_string(),
            unit_price: "unit-price".to_string(),
            qty_display: "qty-display".to_string(),
            total_price: "total-price".to_string(),
            add_to_cart: "add-to-cart-btn".to_string(),
            cart_count: "cart-count".to_string(),
            upload_zone: "upload-zone".to_string(),
            file_input: "logo-upload".to_string(),
            logo_preview: "logo-preview".to_string(),
            logo_preview_img: "logo-preview-img".to_string(),
            mode_radio_name: "logo-mode".to_string(),
            reset_button: None,
            zoom_in_button: None,
            zoom_out_button: None,
            delete_button: None,
        }
    }
}

impl ConfiguratorConfig {
    /// Decodes a JS object; `undefined` and `null` give the defaults.
    pub fn from_js(value: JsValue) -> Result<ConfiguratorConfig> {
        if value.is_undefined() || value.is_null() {
            return Ok(ConfiguratorConfig::default());
        }
        let config: ConfiguratorConfig = serde_wasm_bindgen::from_value(value)
            .map_err(|e| ConfiguratorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("logo_max_size", self.logo_max_size),
            ("reset_scale", self.reset_scale),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfiguratorError::Config(format!("{} must be positive, got {}", name, value)));
            }
        }
        if !(self.zoom_step > 1.0) {
            return Err(ConfiguratorError::Config(format!("zoom_step must be greater than 1, got {}", self.zoom_step)));
        }
        if !(self.zoom_out_step > 0.0 && self.zoom_out_step < 1.0) {
            return Err(ConfiguratorError::Config(format!("zoom_out_step must be within 0..1, got {}", self.zoom_out_step)));
        }
        if self.viewport_margin < 0.0 || self.viewport_margin * 2.0 >= self.canvas_width.min(self.canvas_height) {
            return Err(ConfiguratorError::Config(format!("viewport_margin {} does not fit the canvas", self.viewport_margin)));
        }
        if !(0.0..=1.0).contains(&self.preview_quality) {
            return Err(ConfiguratorError::Config(format!("preview_quality must be within 0..=1, got {}", self.preview_quality)));
        }
        if self.accepted_types.is_empty() {
            return Err(ConfiguratorError::Config("accepted_types is empty".to_string()));
        }
        Ok(())
    }

    pub fn max_upload_mb(&self) -> u64 {
        self.max_upload_bytes / (1024 * 1024)
    }
}
