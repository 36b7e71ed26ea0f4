use crate::types::PriceDisplay;

/// The form controls and status elements the configurator writes to.
pub trait View {
    fn show_price(&self, price: &PriceDisplay);
    /// Rebuild the size selector; an empty list hides the size group.
    fn show_sizes(&self, sizes: &[String]);
    fn set_add_to_cart_enabled(&self, enabled: bool);
    /// Show the processed logo thumbnail and hide the upload zone.
    fn show_logo_preview(&self, url: &str);
    /// Hide the thumbnail and bring the upload zone back.
    fn show_upload_zone(&self);
    fn show_cart_count(&self, count: u32);
    fn alert(&self, message: &str);
}
