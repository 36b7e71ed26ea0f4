use serde::{Deserialize, Serialize};

/// Server-side processing applied to an uploaded logo.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogoMode {
    #[default]
    Bw,
    Transparent,
    RemoveBg,
}

impl LogoMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LogoMode::Bw => "bw",
            LogoMode::Transparent => "transparent",
            LogoMode::RemoveBg => "remove_bg",
        }
    }

    /// Unknown values fall back to `bw`, the same as the upload endpoint.
    pub fn from_value(value: &str) -> LogoMode {
        match value {
            "transparent" => LogoMode::Transparent,
            "remove_bg" => LogoMode::RemoveBg,
            _ => LogoMode::Bw,
        }
    }
}

/// Position of a layer: centre point, per-axis scale and rotation in degrees.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub angle: f64,
}

impl Placement {
    pub fn centered(width: f64, height: f64, scale: f64) -> Placement {
        Placement { left: width / 2.0, top: height / 2.0, scale_x: scale, scale_y: scale, angle: 0.0 }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub enum HandleType {
    TopLeft, TopRight, BottomLeft, BottomRight,
    Rotate,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum PreviewFormat {
    #[default]
    Png,
    Jpeg,
}

impl PreviewFormat {
    pub fn mime(self) -> &'static str {
        match self {
            PreviewFormat::Png => "image/png",
            PreviewFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Look of the selection frame drawn around an interactive layer.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct SelectionStyle {
    pub corner_color: String,
    pub corner_size: f64,
    pub transparent_corners: bool,
    pub border_color: String,
    pub border_scale_factor: f64,
    pub rotate_offset: f64,
}

impl Default for SelectionStyle {
    fn default() -> Self {
        SelectionStyle {
            corner_color: "#3498db".to_string(),
            corner_size: 10.0,
            transparent_corners: false,
            border_color: "#3498db".to_string(),
            border_scale_factor: 2.0,
            rotate_offset: 40.0,
        }
    }
}

/// Raw attributes of one `<option>` in the product select.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductOption {
    pub value: String,
    pub price: Option<String>,
    pub image: Option<String>,
    pub sizes: Option<String>,
    pub category: Option<String>,
}

/// The product the shopper is configuring.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Product {
    pub id: i64,
    pub price: f64,
    pub image_url: String,
    pub sizes: Vec<String>,
}

/// Processed logo as reported by the upload endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadedLogo {
    pub processed_url: String,
    pub filename: String,
    pub original_url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub mode: Option<LogoMode>,
}

/// A successfully uploaded logo together with the file it came from.
#[derive(Clone, Debug)]
pub struct LogoAsset<F> {
    pub server_url: String,
    pub server_filename: String,
    pub original_file: F,
}

/// Body of `POST /cart/add`.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CartLineItem {
    pub product_id: i64,
    pub size: Option<String>,
    pub quantity: u32,
    pub logo_filename: String,
    pub logo_position: Option<Placement>,
    pub preview_data_url: String,
}

/// Text shown in the unit price, quantity and total elements.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceDisplay {
    pub unit: String,
    pub quantity: u32,
    pub total: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn logo_mode_wire_values() {
        assert_eq!(LogoMode::RemoveBg.as_str(), "remove_bg");
        assert_eq!(LogoMode::from_value("transparent"), LogoMode::Transparent);
        assert_eq!(LogoMode::from_value("sepia"), LogoMode::Bw);
        assert_eq!(serde_json::to_string(&LogoMode::RemoveBg).unwrap(), "\"remove_bg\"");
    }

    #[test]
    fn placement_uses_canvas_field_names() {
        let p = Placement { left: 250.0, top: 200.0, scale_x: 0.5, scale_y: 0.5, angle: 15.0 };
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(json, serde_json::json!({"left": 250.0, "top": 200.0, "scaleX": 0.5, "scaleY": 0.5, "angle": 15.0}));
    }

    #[test]
    fn cart_item_serializes_missing_size_as_null() {
        let item = CartLineItem {
            product_id: 3,
            size: None,
            quantity: 2,
            logo_filename: "abc_bw.png".into(),
            logo_position: None,
            preview_data_url: "data:image/png;base64,AAAA".into(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["size"], serde_json::Value::Null);
        assert_eq!(json["product_id"], 3);
        assert_eq!(json["logo_filename"], "abc_bw.png");
    }
}
