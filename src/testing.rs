//! Test doubles for the backend, the view and uploaded files.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Cursor;

use async_trait::async_trait;
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};

use crate::backend::Backend;
use crate::error::{ConfiguratorError, Result};
use crate::types::{CartLineItem, LogoMode, PriceDisplay, UploadedLogo};
use crate::upload::LogoFile;
use crate::view::View;

#[derive(Clone, Debug, PartialEq)]
pub struct FakeFile {
    pub name: String,
    pub mime: String,
    pub size: f64,
}

impl FakeFile {
    pub fn new(name: &str, mime: &str, size: f64) -> FakeFile {
        FakeFile { name: name.to_string(), mime: mime.to_string(), size }
    }
}

impl LogoFile for FakeFile {
    fn name(&self) -> String { self.name.clone() }
    fn mime_type(&self) -> String { self.mime.clone() }
    fn size(&self) -> f64 { self.size }
}

/// Reply the upload endpoint would give for a processed file at `url`.
pub fn uploaded(url: &str) -> UploadedLogo {
    let filename = url.rsplit('/').next().unwrap_or(url).to_string();
    UploadedLogo {
        processed_url: url.to_string(),
        filename,
        original_url: None,
        width: None,
        height: None,
        mode: None,
    }
}

pub fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .unwrap();
    bytes
}

/// Answers from queued replies and records every request.
#[derive(Default)]
pub struct ScriptedBackend {
    uploads: RefCell<Vec<(String, LogoMode)>>,
    upload_replies: RefCell<VecDeque<Result<UploadedLogo>>>,
    carts: RefCell<Vec<CartLineItem>>,
    cart_replies: RefCell<VecDeque<Result<u32>>>,
    upload_hook: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl ScriptedBackend {
    pub fn reply_upload(&self, reply: Result<UploadedLogo>) {
        self.upload_replies.borrow_mut().push_back(reply);
    }

    pub fn reply_cart(&self, reply: Result<u32>) {
        self.cart_replies.borrow_mut().push_back(reply);
    }

    /// Runs once while the next upload is in flight.
    pub fn during_upload(&self, hook: impl FnOnce() + 'static) {
        *self.upload_hook.borrow_mut() = Some(Box::new(hook));
    }

    pub fn uploads(&self) -> Vec<(String, LogoMode)> { self.uploads.borrow().clone() }
    pub fn carts(&self) -> Vec<CartLineItem> { self.carts.borrow().clone() }
}

#[async_trait(?Send)]
impl Backend for ScriptedBackend {
    type File = FakeFile;

    async fn upload_logo(&self, file: &FakeFile, mode: LogoMode) -> Result<UploadedLogo> {
        self.uploads.borrow_mut().push((file.name.clone(), mode));
        let hook = self.upload_hook.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }
        self.upload_replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ConfiguratorError::Transport("no scripted upload reply".into())))
    }

    async fn add_to_cart(&self, item: &CartLineItem) -> Result<u32> {
        self.carts.borrow_mut().push(item.clone());
        self.cart_replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ConfiguratorError::Transport("no scripted cart reply".into())))
    }
}

#[derive(Default)]
pub struct RecordingView {
    prices: RefCell<Vec<PriceDisplay>>,
    sizes: RefCell<Vec<Vec<String>>>,
    enabled: RefCell<Vec<bool>>,
    previews: RefCell<Vec<String>>,
    upload_zone: RefCell<usize>,
    cart_counts: RefCell<Vec<u32>>,
    alerts: RefCell<Vec<String>>,
}

impl RecordingView {
    pub fn last_price(&self) -> Option<PriceDisplay> { self.prices.borrow().last().cloned() }
    pub fn sizes(&self) -> Vec<Vec<String>> { self.sizes.borrow().clone() }
    pub fn last_enabled(&self) -> Option<bool> { self.enabled.borrow().last().copied() }
    pub fn previews(&self) -> Vec<String> { self.previews.borrow().clone() }
    pub fn upload_zone_shown(&self) -> usize { *self.upload_zone.borrow() }
    pub fn cart_counts(&self) -> Vec<u32> { self.cart_counts.borrow().clone() }
    pub fn alerts(&self) -> Vec<String> { self.alerts.borrow().clone() }
}

impl View for RecordingView {
    fn show_price(&self, price: &PriceDisplay) { self.prices.borrow_mut().push(price.clone()); }
    fn show_sizes(&self, sizes: &[String]) { self.sizes.borrow_mut().push(sizes.to_vec()); }
    fn set_add_to_cart_enabled(&self, enabled: bool) { self.enabled.borrow_mut().push(enabled); }
    fn show_logo_preview(&self, url: &str) { self.previews.borrow_mut().push(url.to_string()); }
    fn show_upload_zone(&self) { *self.upload_zone.borrow_mut() += 1; }
    fn show_cart_count(&self, count: u32) { self.cart_counts.borrow_mut().push(count); }
    fn alert(&self, message: &str) { self.alerts.borrow_mut().push(message.to_string()); }
}
