//! The configurator core: one state object and the operations the page
//! triggers on it.
//!
//! Everything runs on the browser's single thread. The session lives in a
//! `RefCell` and is never borrowed across an `.await`; each asynchronous
//! channel carries a [`Generation`] so a completion that was superseded
//! while in flight is dropped instead of applied.

use std::cell::{Ref, RefCell};

use crate::backend::Backend;
use crate::compositor::{Compositor, Zoom};
use crate::config::ConfiguratorConfig;
use crate::error::{ConfiguratorError, ErrorKind, Result};
use crate::form::{parse_product, parse_quantity, price_display};
use crate::generation::Generation;
use crate::selection::{begin_drag, drag_to, Drag};
use crate::surface::Surface;
use crate::types::{CartLineItem, LogoAsset, LogoMode, Placement, Product, ProductOption};
use crate::upload::{validate_logo_file, LogoFile};
use crate::view::View;

const UPLOAD_FAILED: &str = "Failed to upload logo. Please try again.";
const CART_FAILED: &str = "Failed to add to cart. Please try again.";
const IMAGE_FAILED: &str = "Failed to load image. Please try again.";

pub struct Session<F, I> {
    pub product: Option<Product>,
    pub quantity: u32,
    pub size: Option<String>,
    pub mode: LogoMode,
    pub logo: Option<LogoAsset<F>>,
    pub scene: Compositor<I>,
    in_flight: Option<F>,
    drag: Option<Drag>,
    uploads: Generation,
    backgrounds: Generation,
    overlays: Generation,
}

pub struct Configurator<B: Backend, S: Surface, V: View> {
    config: ConfiguratorConfig,
    backend: B,
    surface: S,
    view: V,
    session: RefCell<Session<B::File, S::Image>>,
}

impl<B: Backend, S: Surface, V: View> Configurator<B, S, V> {
    pub fn new(config: ConfiguratorConfig, backend: B, surface: S, view: V) -> Self {
        let mut scene = Compositor::new(config.canvas_width, config.canvas_height);
        scene.margin = config.viewport_margin;
        scene.logo_max_size = config.logo_max_size;
        scene.reset_scale = config.reset_scale;
        scene.zoom_step = config.zoom_step;
        scene.zoom_out_step = config.zoom_out_step;
        scene.background_color = config.background_color.clone();
        scene.selection = config.selection.clone();

        let session = Session {
            product: None,
            quantity: 1,
            size: None,
            mode: config.default_mode,
            logo: None,
            scene,
            in_flight: None,
            drag: None,
            uploads: Generation::default(),
            backgrounds: Generation::default(),
            overlays: Generation::default(),
        };
        Configurator { config, backend, surface, view, session: RefCell::new(session) }
    }

    pub fn config(&self) -> &ConfiguratorConfig { &self.config }
    pub fn backend(&self) -> &B { &self.backend }
    pub fn surface(&self) -> &S { &self.surface }
    pub fn view(&self) -> &V { &self.view }

    pub fn session(&self) -> Ref<'_, Session<B::File, S::Image>> {
        self.session.borrow()
    }

    /// Push the initial price and button state to the page.
    pub fn refresh(&self) {
        self.redraw();
        self.update_price();
        self.refresh_cart_button();
    }

    // ----- form state -----

    pub async fn select_product(&self, option: &ProductOption) -> Result<()> {
        let product = match parse_product(option) {
            Ok(p) => p,
            Err(e) => {
                self.fail(&e, IMAGE_FAILED);
                return Err(e);
            }
        };

        let image_url = {
            let mut s = self.session.borrow_mut();
            s.backgrounds.cancel();
            s.scene.clear_background();
            s.size = product.as_ref().and_then(|p| p.sizes.first().cloned());
            let url = product.as_ref().map(|p| p.image_url.clone());
            if product.is_none() {
                // The logo asset survives; its overlay comes back with the next product.
                s.overlays.cancel();
                s.scene.remove_overlay();
                s.drag = None;
            }
            s.product = product;
            url
        };

        match self.session.borrow().product.as_ref() {
            Some(p) => {
                log::info!("selected product {} at {:.2} with {} sizes", p.id, p.price, p.sizes.len());
                self.view.show_sizes(&p.sizes);
            }
            None => {
                log::info!("product selection cleared");
                self.view.show_sizes(&[]);
            }
        }
        self.redraw();
        self.update_price();
        self.refresh_cart_button();

        match image_url {
            Some(url) => self.load_background(&url).await,
            None => Ok(()),
        }
    }

    pub fn set_quantity(&self, raw: &str) {
        self.session.borrow_mut().quantity = parse_quantity(raw);
        self.update_price();
    }

    /// An empty value means no size.
    pub fn select_size(&self, value: &str) {
        self.session.borrow_mut().size = if value.is_empty() { None } else { Some(value.to_string()) };
    }

    pub fn can_add_to_cart(&self) -> bool {
        let s = self.session.borrow();
        s.product.is_some() && s.logo.is_some() && s.scene.has_overlay()
    }

    fn update_price(&self) {
        let display = {
            let s = self.session.borrow();
            price_display(s.product.as_ref(), s.quantity, &self.config.currency_symbol)
        };
        self.view.show_price(&display);
    }

    fn refresh_cart_button(&self) {
        self.view.set_add_to_cart_enabled(self.can_add_to_cart());
    }

    // ----- upload -----

    pub async fn upload_logo(&self, file: B::File) -> Result<()> {
        if let Err(e) = validate_logo_file(&file, &self.config) {
            self.fail(&e, UPLOAD_FAILED);
            return Err(e);
        }

        let (ticket, mode) = {
            let mut s = self.session.borrow_mut();
            s.in_flight = Some(file.clone());
            (s.uploads.begin(), s.mode)
        };
        log::info!("uploading {} ({} bytes) in mode {}", file.name(), file.size(), mode.as_str());

        let result = self.backend.upload_logo(&file, mode).await;

        {
            let mut s = self.session.borrow_mut();
            if !s.uploads.is_current(ticket) {
                match &result {
                    Ok(_) => log::debug!("dropping superseded upload of {}", file.name()),
                    Err(e) => log::warn!("superseded upload of {} failed: {}", file.name(), e),
                }
                return Ok(());
            }
            s.in_flight = None;
        }

        let uploaded = match result {
            Ok(u) => u,
            Err(e) => {
                self.fail(&e, UPLOAD_FAILED);
                self.refresh_cart_button();
                return Err(e);
            }
        };
        log::info!("logo processed as {} ({})", uploaded.filename, uploaded.processed_url);

        self.session.borrow_mut().logo = Some(LogoAsset {
            server_url: uploaded.processed_url.clone(),
            server_filename: uploaded.filename.clone(),
            original_file: file,
        });
        self.view.show_logo_preview(&uploaded.processed_url);
        self.refresh_cart_button();
        self.place_overlay(&uploaded.processed_url).await
    }

    /// Re-sends the stored original file when the processing mode changes.
    pub async fn set_logo_mode(&self, mode: LogoMode) -> Result<()> {
        let file = {
            let mut s = self.session.borrow_mut();
            s.mode = mode;
            s.in_flight
                .clone()
                .or_else(|| s.logo.as_ref().map(|l| l.original_file.clone()))
        };
        match file {
            Some(file) => {
                log::info!("logo mode changed to {}, re-uploading {}", mode.as_str(), file.name());
                self.upload_logo(file).await
            }
            None => Ok(()),
        }
    }

    // ----- scene -----

    async fn load_background(&self, url: &str) -> Result<()> {
        let ticket = self.session.borrow_mut().backgrounds.begin();
        let loaded = self.surface.load_image(url).await;

        if !self.session.borrow().backgrounds.is_current(ticket) {
            log::debug!("dropping superseded background {}", url);
            return Ok(());
        }
        let image = loaded.map_err(|e| self.fail_with(e, IMAGE_FAILED))?;
        let (w, h) = self.surface.image_size(&image);

        let logo_url = {
            let mut s = self.session.borrow_mut();
            s.scene.set_background(image, w, h).map_err(|e| self.fail_with(e, IMAGE_FAILED))?;
            match (&s.logo, s.scene.has_overlay()) {
                (Some(logo), false) => Some(logo.server_url.clone()),
                _ => None,
            }
        };
        self.redraw();

        match logo_url {
            Some(url) => self.place_overlay(&url).await,
            None => Ok(()),
        }
    }

    async fn place_overlay(&self, url: &str) -> Result<()> {
        let ticket = self.session.borrow_mut().overlays.begin();
        let loaded = self.surface.load_image(url).await;

        if !self.session.borrow().overlays.is_current(ticket) {
            log::debug!("dropping superseded logo image {}", url);
            return Ok(());
        }
        let image = loaded.map_err(|e| self.fail_with(e, IMAGE_FAILED))?;
        let (w, h) = self.surface.image_size(&image);
        {
            let mut s = self.session.borrow_mut();
            s.scene.set_overlay(image, w, h).map_err(|e| self.fail_with(e, IMAGE_FAILED))?;
            s.drag = None;
        }
        self.redraw();
        self.refresh_cart_button();
        Ok(())
    }

    pub fn reset_logo_position(&self) -> bool {
        let changed = self.session.borrow_mut().scene.reset_overlay();
        if changed { self.redraw(); }
        changed
    }

    pub fn zoom(&self, zoom: Zoom) -> bool {
        let changed = self.session.borrow_mut().scene.zoom_overlay(zoom);
        if changed { self.redraw(); }
        changed
    }

    pub fn zoom_in(&self) -> bool { self.zoom(Zoom::In) }
    pub fn zoom_out(&self) -> bool { self.zoom(Zoom::Out) }

    /// Removes the overlay and forgets the logo, including any upload still in flight.
    pub fn delete_logo(&self) -> bool {
        {
            let mut s = self.session.borrow_mut();
            let had_overlay = s.scene.remove_overlay().is_some();
            if !had_overlay && s.logo.is_none() && s.in_flight.is_none() {
                return false;
            }
            s.logo = None;
            s.in_flight = None;
            s.drag = None;
            s.uploads.cancel();
            s.overlays.cancel();
        }
        log::info!("logo deleted");
        self.view.show_upload_zone();
        self.redraw();
        self.refresh_cart_button();
        true
    }

    pub fn logo_position(&self) -> Option<Placement> {
        self.session.borrow().scene.overlay_transform()
    }

    pub fn set_logo_position(&self, placement: Placement) -> bool {
        let changed = self.session.borrow_mut().scene.set_overlay_transform(placement);
        if changed { self.redraw(); }
        changed
    }

    pub fn preview_data_url(&self) -> Result<String> {
        let s = self.session.borrow();
        self.surface.snapshot(&s.scene, self.config.preview_format, self.config.preview_quality)
    }

    // ----- pointer -----

    /// Returns whether the press landed on the logo and started a gesture.
    pub fn pointer_down(&self, x: f64, y: f64) -> bool {
        let mut s = self.session.borrow_mut();
        let drag = begin_drag(&s.scene, x, y);
        s.drag = drag;
        drag.is_some()
    }

    pub fn pointer_move(&self, x: f64, y: f64) -> bool {
        let placement = match self.session.borrow().drag {
            Some(drag) => drag_to(&drag, x, y),
            None => return false,
        };
        self.set_logo_position(placement)
    }

    pub fn pointer_up(&self) {
        self.session.borrow_mut().drag = None;
    }

    // ----- cart -----

    pub fn build_line_item(&self) -> Result<CartLineItem> {
        let s = self.session.borrow();
        let (product, logo) = match (&s.product, &s.logo) {
            (Some(p), Some(l)) => (p, l),
            _ => return Err(ConfiguratorError::IncompleteDesign),
        };
        let preview = self.surface.snapshot(&s.scene, self.config.preview_format, self.config.preview_quality)?;
        Ok(CartLineItem {
            product_id: product.id,
            size: s.size.clone(),
            quantity: s.quantity,
            logo_filename: logo.server_filename.clone(),
            logo_position: s.scene.overlay_transform(),
            preview_data_url: preview,
        })
    }

    pub async fn add_to_cart(&self) -> Result<u32> {
        let item = self.build_line_item().map_err(|e| self.fail_with(e, CART_FAILED))?;
        log::info!("adding product {} x{} with logo {} to cart", item.product_id, item.quantity, item.logo_filename);

        let count = self.backend.add_to_cart(&item).await.map_err(|e| self.fail_with(e, CART_FAILED))?;
        log::info!("cart now holds {} items", count);
        self.view.show_cart_count(count);
        if let Some(msg) = &self.config.cart_success_message {
            self.view.alert(msg);
        }
        Ok(count)
    }

    // ----- helpers -----

    fn redraw(&self) {
        let s = self.session.borrow();
        self.surface.render(&s.scene);
    }

    fn fail(&self, err: &ConfiguratorError, fallback: &str) {
        match err.kind() {
            ErrorKind::Transport => log::error!("{}", err),
            ErrorKind::Server | ErrorKind::Validation => log::warn!("{}", err),
        }
        self.view.alert(&err.alert_text(fallback));
    }

    fn fail_with(&self, err: ConfiguratorError, fallback: &str) -> ConfiguratorError {
        self.fail(&err, fallback);
        err
    }
}
