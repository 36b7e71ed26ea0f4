use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{File, HtmlCanvasElement, HtmlSelectElement};

use crate::config::ConfiguratorConfig;
use crate::dom::{bind, require, selected_option, DomView, WebConfigurator};
use crate::error::ConfiguratorError;
use crate::io::FetchBackend;
use crate::render::WebSurface;
use crate::types::Placement;

/// The widget as seen from JavaScript. Construct it once the page has
/// loaded; it finds its elements by id and wires its own listeners.
#[wasm_bindgen]
pub struct ProductConfigurator {
    inner: Rc<WebConfigurator>,
}

#[wasm_bindgen]
impl ProductConfigurator {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ProductConfigurator, JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let mut config = ConfiguratorConfig::from_js(config)?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| ConfiguratorError::MissingElement("document".to_string()))?;

        let canvas: HtmlCanvasElement = require(&document, &config.elements.canvas)?;
        let surface = WebSurface::new(canvas)?;
        // The element's own size wins over the configured one.
        let (width, height) = surface.size();
        if width > 0.0 && height > 0.0 {
            config.canvas_width = width;
            config.canvas_height = height;
        }
        config.validate()?;

        let backend = FetchBackend::new(&config);
        let view = DomView::new(document.clone(), config.elements.clone());
        let inner = Rc::new(WebConfigurator::new(config, backend, surface, view));
        bind(&inner, &document)?;
        inner.refresh();
        log::info!("configurator mounted at {}x{}", width, height);
        Ok(ProductConfigurator { inner })
    }

    /// Re-reads the product select, for pages that call it from markup.
    pub fn update_product(&self) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| ConfiguratorError::MissingElement("document".to_string()))?;
        let select: HtmlSelectElement = require(&document, &self.inner.config().elements.product_select)?;
        if let Some(option) = selected_option(&select) {
            let app = self.inner.clone();
            spawn_local(async move {
                let _ = app.select_product(&option).await;
            });
        }
        Ok(())
    }

    pub fn upload_file(&self, file: File) {
        let app = self.inner.clone();
        spawn_local(async move {
            let _ = app.upload_logo(file).await;
        });
    }

    pub fn reset_logo_position(&self) -> bool {
        self.inner.reset_logo_position()
    }

    pub fn zoom_in(&self) -> bool {
        self.inner.zoom_in()
    }

    pub fn zoom_out(&self) -> bool {
        self.inner.zoom_out()
    }

    pub fn delete_selected(&self) -> bool {
        self.inner.delete_logo()
    }

    pub fn can_add_to_cart(&self) -> bool {
        self.inner.can_add_to_cart()
    }

    pub fn add_to_cart(&self) {
        let app = self.inner.clone();
        spawn_local(async move {
            let _ = app.add_to_cart().await;
        });
    }

    /// `{left, top, scaleX, scaleY, angle}` or `null` without a logo.
    pub fn logo_position(&self) -> Result<JsValue, JsValue> {
        match self.inner.logo_position() {
            Some(p) => serde_wasm_bindgen::to_value(&p).map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn set_logo_position(&self, position: JsValue) -> Result<bool, JsValue> {
        let placement: Placement = serde_wasm_bindgen::from_value(position)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(self.inner.set_logo_position(placement))
    }

    pub fn preview_data_url(&self) -> Result<String, JsValue> {
        Ok(self.inner.preview_data_url()?)
    }
}
