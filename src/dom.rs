//! Page bindings: the form view and the event listeners that drive the
//! configurator from the stock markup.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, DragEvent, Event, EventTarget, File, HtmlButtonElement, HtmlCanvasElement, HtmlElement,
    HtmlImageElement, HtmlInputElement, HtmlOptionElement, HtmlSelectElement, MouseEvent, UrlSearchParams,
};

use crate::config::ElementIds;
use crate::engine::Configurator;
use crate::error::{ConfiguratorError, Result};
use crate::form::category_visibility;
use crate::io::FetchBackend;
use crate::render::WebSurface;
use crate::types::{LogoMode, PriceDisplay, ProductOption};
use crate::view::View;

pub type WebConfigurator = Configurator<FetchBackend, WebSurface, DomView>;

pub fn require<T: JsCast>(document: &Document, id: &str) -> Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| ConfiguratorError::MissingElement(id.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| ConfiguratorError::MissingElement(id.to_string()))
}

/// Writes configurator state into the page. Missing status elements are
/// logged and skipped.
pub struct DomView {
    document: Document,
    ids: ElementIds,
}

impl DomView {
    pub fn new(document: Document, ids: ElementIds) -> DomView {
        DomView { document, ids }
    }

    fn find<T: JsCast>(&self, id: &str) -> Option<T> {
        match require::<T>(&self.document, id) {
            Ok(el) => Some(el),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.find::<HtmlElement>(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_display(&self, id: &str, value: &str) {
        if let Some(el) = self.find::<HtmlElement>(id) {
            if let Err(e) = el.style().set_property("display", value) {
                log::warn!("cannot style #{}: {:?}", id, e);
            }
        }
    }
}

impl View for DomView {
    fn show_price(&self, price: &PriceDisplay) {
        self.set_text(&self.ids.unit_price, &price.unit);
        self.set_text(&self.ids.qty_display, &price.quantity.to_string());
        self.set_text(&self.ids.total_price, &price.total);
    }

    fn show_sizes(&self, sizes: &[String]) {
        if let Some(select) = self.find::<HtmlSelectElement>(&self.ids.size_select) {
            select.set_inner_html("");
            for size in sizes {
                let option = match self.document.create_element("option") {
                    Ok(el) => el,
                    Err(e) => {
                        log::error!("cannot create size option: {:?}", e);
                        return;
                    }
                };
                option.set_attribute("value", size).ok();
                option.set_text_content(Some(size));
                select.append_child(&option).ok();
            }
        }
        self.set_display(&self.ids.size_group, if sizes.is_empty() { "none" } else { "block" });
    }

    fn set_add_to_cart_enabled(&self, enabled: bool) {
        if let Some(button) = self.find::<HtmlButtonElement>(&self.ids.add_to_cart) {
            button.set_disabled(!enabled);
        }
    }

    fn show_logo_preview(&self, url: &str) {
        if let Some(img) = self.find::<HtmlImageElement>(&self.ids.logo_preview_img) {
            img.set_src(url);
        }
        self.set_display(&self.ids.logo_preview, "block");
        self.set_display(&self.ids.upload_zone, "none");
    }

    fn show_upload_zone(&self) {
        self.set_display(&self.ids.logo_preview, "none");
        self.set_display(&self.ids.upload_zone, "block");
        // So picking the same file again still fires `change`.
        if let Some(input) = self.find::<HtmlInputElement>(&self.ids.file_input) {
            input.set_value("");
        }
    }

    fn show_cart_count(&self, count: u32) {
        self.set_text(&self.ids.cart_count, &count.to_string());
        self.set_display(&self.ids.cart_count, "inline");
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            window.alert_with_message(message).ok();
        }
    }
}

pub fn read_option(option: &HtmlOptionElement) -> ProductOption {
    ProductOption {
        value: option.value(),
        price: option.get_attribute("data-price"),
        image: option.get_attribute("data-image"),
        sizes: option.get_attribute("data-sizes"),
        category: option.get_attribute("data-category"),
    }
}

fn select_options(select: &HtmlSelectElement) -> Vec<HtmlOptionElement> {
    (0..select.length())
        .filter_map(|i| select.item(i))
        .filter_map(|el| el.dyn_into::<HtmlOptionElement>().ok())
        .collect()
}

pub fn selected_option(select: &HtmlSelectElement) -> Option<ProductOption> {
    let index = select.selected_index();
    if index < 0 { return None; }
    select
        .item(index as u32)
        .and_then(|el| el.dyn_into::<HtmlOptionElement>().ok())
        .map(|o| read_option(&o))
}

/// Hides product options outside the `?category=` given in the page URL.
pub fn apply_category_filter(document: &Document, ids: &ElementIds) -> Result<()> {
    let search = match web_sys::window().and_then(|w| w.location().search().ok()) {
        Some(s) => s,
        None => return Ok(()),
    };
    let params = UrlSearchParams::new_with_str(&search)
        .map_err(|e| ConfiguratorError::from_js(ConfiguratorError::Config, &e))?;
    let category = match params.get("category") {
        Some(c) if !c.trim().is_empty() => c,
        _ => return Ok(()),
    };

    let select: HtmlSelectElement = require(document, &ids.product_select)?;
    let elements = select_options(&select);
    let options: Vec<ProductOption> = elements.iter().map(read_option).collect();
    let visible = category_visibility(&options, &category);
    for (el, show) in elements.iter().zip(visible) {
        el.set_hidden(!show);
    }
    log::info!("filtered products to category {}", category);
    Ok(())
}

pub fn mode_radio_selector(name: &str) -> String {
    format!("input[name=\"{}\"]", name)
}

/// Maps a client-space pointer position onto canvas pixels, undoing any
/// CSS scaling of the element.
pub fn canvas_point(client: (f64, f64), rect: (f64, f64, f64, f64), canvas: (f64, f64)) -> (f64, f64) {
    let (left, top, width, height) = rect;
    let sx = if width > 0.0 { canvas.0 / width } else { 1.0 };
    let sy = if height > 0.0 { canvas.1 / height } else { 1.0 };
    ((client.0 - left) * sx, (client.1 - top) * sy)
}

fn pointer_position(canvas: &HtmlCanvasElement, e: &MouseEvent) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    canvas_point(
        (e.client_x() as f64, e.client_y() as f64),
        (rect.left(), rect.top(), rect.width(), rect.height()),
        (canvas.width() as f64, canvas.height() as f64),
    )
}

fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        log::error!("cannot listen for {}: {:?}", event, e);
    }
    closure.forget();
}

fn start_upload(app: &Rc<WebConfigurator>, file: File) {
    let app = app.clone();
    spawn_local(async move {
        // Failures are already logged and alerted.
        let _ = app.upload_logo(file).await;
    });
}

/// Attaches every listener the widget needs. Only the product select and
/// the canvas are mandatory; other controls are wired when present.
pub fn bind(app: &Rc<WebConfigurator>, document: &Document) -> Result<()> {
    let ids = app.config().elements.clone();

    let product: HtmlSelectElement = require(document, &ids.product_select)?;
    {
        let app = app.clone();
        let select = product.clone();
        listen(&product, "change", move |_| {
            if let Some(option) = selected_option(&select) {
                let app = app.clone();
                spawn_local(async move {
                    let _ = app.select_product(&option).await;
                });
            }
        });
    }

    if let Ok(quantity) = require::<HtmlInputElement>(document, &ids.quantity) {
        let app = app.clone();
        let input = quantity.clone();
        listen(&quantity, "input", move |_| app.set_quantity(&input.value()));
    }

    if let Ok(size) = require::<HtmlSelectElement>(document, &ids.size_select) {
        let app = app.clone();
        let select = size.clone();
        listen(&size, "change", move |_| app.select_size(&select.value()));
    }

    bind_mode_radios(app, document, &ids)?;
    bind_upload(app, document, &ids);
    bind_canvas(app, &require(document, &ids.canvas)?);

    if let Ok(button) = require::<HtmlElement>(document, &ids.add_to_cart) {
        let app = app.clone();
        listen(&button, "click", move |_| {
            let app = app.clone();
            spawn_local(async move {
                let _ = app.add_to_cart().await;
            });
        });
    }

    let buttons: [(&Option<String>, fn(&WebConfigurator) -> bool); 4] = [
        (&ids.reset_button, WebConfigurator::reset_logo_position),
        (&ids.zoom_in_button, WebConfigurator::zoom_in),
        (&ids.zoom_out_button, WebConfigurator::zoom_out),
        (&ids.delete_button, WebConfigurator::delete_logo),
    ];
    for (id, action) in buttons {
        if let Some(id) = id {
            let button: HtmlElement = require(document, id)?;
            let app = app.clone();
            listen(&button, "click", move |_| {
                action(&app);
            });
        }
    }

    apply_category_filter(document, &ids)?;
    Ok(())
}

fn bind_mode_radios(app: &Rc<WebConfigurator>, document: &Document, ids: &ElementIds) -> Result<()> {
    let radios = document
        .query_selector_all(&mode_radio_selector(&ids.mode_radio_name))
        .map_err(|e| ConfiguratorError::from_js(ConfiguratorError::MissingElement, &e))?;
    for i in 0..radios.length() {
        let radio = match radios.get(i).and_then(|n| n.dyn_into::<HtmlInputElement>().ok()) {
            Some(r) => r,
            None => continue,
        };
        if radio.checked() {
            let mode = LogoMode::from_value(&radio.value());
            let app = app.clone();
            spawn_local(async move {
                let _ = app.set_logo_mode(mode).await;
            });
        }
        let app = app.clone();
        let input = radio.clone();
        listen(&radio, "change", move |_| {
            if !input.checked() { return; }
            let mode = LogoMode::from_value(&input.value());
            let app = app.clone();
            spawn_local(async move {
                let _ = app.set_logo_mode(mode).await;
            });
        });
    }
    Ok(())
}

fn bind_upload(app: &Rc<WebConfigurator>, document: &Document, ids: &ElementIds) {
    let zone = require::<HtmlElement>(document, &ids.upload_zone).ok();
    let input = require::<HtmlInputElement>(document, &ids.file_input).ok();

    if let Some(input) = &input {
        let app = app.clone();
        let field = input.clone();
        listen(input, "change", move |_| {
            if let Some(file) = field.files().and_then(|f| f.get(0)) {
                start_upload(&app, file);
            }
        });
    }

    let zone = match zone {
        Some(z) => z,
        None => return,
    };
    if let Some(input) = input {
        listen(&zone, "click", move |_| input.click());
    }
    {
        let target = zone.clone();
        listen(&zone, "dragover", move |e| {
            e.prevent_default();
            target.class_list().add_1("dragover").ok();
        });
    }
    {
        let target = zone.clone();
        listen(&zone, "dragleave", move |_| {
            target.class_list().remove_1("dragover").ok();
        });
    }
    {
        let app = app.clone();
        let target = zone.clone();
        listen(&zone, "drop", move |e| {
            e.prevent_default();
            target.class_list().remove_1("dragover").ok();
            let file = e
                .dyn_ref::<DragEvent>()
                .and_then(|d| d.data_transfer())
                .and_then(|dt| dt.files())
                .and_then(|files| files.get(0));
            if let Some(file) = file {
                start_upload(&app, file);
            }
        });
    }
}

fn bind_canvas(app: &Rc<WebConfigurator>, canvas: &HtmlCanvasElement) {
    {
        let app = app.clone();
        let el = canvas.clone();
        listen(canvas, "mousedown", move |e| {
            if let Some(m) = e.dyn_ref::<MouseEvent>() {
                let (x, y) = pointer_position(&el, m);
                if app.pointer_down(x, y) {
                    e.prevent_default();
                }
            }
        });
    }
    {
        let app = app.clone();
        let el = canvas.clone();
        listen(canvas, "mousemove", move |e| {
            if let Some(m) = e.dyn_ref::<MouseEvent>() {
                let (x, y) = pointer_position(&el, m);
                app.pointer_move(x, y);
            }
        });
    }
    for event in ["mouseup", "mouseleave"] {
        let app = app.clone();
        listen(canvas, event, move |_| app.pointer_up());
    }
}
