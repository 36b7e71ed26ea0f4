//! `fetch`-based backend for the browser.

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, Response};

use crate::backend::{parse_cart_reply, parse_upload_reply, Backend};
use crate::config::ConfiguratorConfig;
use crate::error::{ConfiguratorError, Result};
use crate::types::{CartLineItem, LogoMode, UploadedLogo};

pub struct FetchBackend {
    upload_url: String,
    cart_url: String,
}

impl FetchBackend {
    pub fn new(config: &ConfiguratorConfig) -> FetchBackend {
        FetchBackend { upload_url: config.upload_url.clone(), cart_url: config.cart_url.clone() }
    }

    /// Sends `request` and returns the body text whatever the status; error
    /// replies carry their message in the JSON body.
    async fn send(&self, request: Request) -> Result<String> {
        let transport = |e: JsValue| ConfiguratorError::from_js(ConfiguratorError::Transport, &e);
        let window = web_sys::window().ok_or_else(|| ConfiguratorError::Transport("no window".to_string()))?;
        let reply = JsFuture::from(window.fetch_with_request(&request)).await.map_err(transport)?;
        let response: Response = reply
            .dyn_into()
            .map_err(|_| ConfiguratorError::Transport("fetch did not return a Response".to_string()))?;
        if !response.ok() {
            log::warn!("{} answered {}", response.url(), response.status());
        }
        let text = JsFuture::from(response.text().map_err(transport)?).await.map_err(transport)?;
        text.as_string()
            .ok_or_else(|| ConfiguratorError::MalformedResponse("reply body is not text".to_string()))
    }
}

#[async_trait(?Send)]
impl Backend for FetchBackend {
    type File = File;

    async fn upload_logo(&self, file: &File, mode: LogoMode) -> Result<UploadedLogo> {
        let transport = |e: JsValue| ConfiguratorError::from_js(ConfiguratorError::Transport, &e);
        let form = FormData::new().map_err(transport)?;
        form.append_with_blob("logo", file).map_err(transport)?;
        form.append_with_str("mode", mode.as_str()).map_err(transport)?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_body(&form);
        let request = Request::new_with_str_and_init(&self.upload_url, &init).map_err(transport)?;

        log::info!("uploading {} ({})", file.name(), mode.as_str());
        let body = self.send(request).await?;
        parse_upload_reply(&body)
    }

    async fn add_to_cart(&self, item: &CartLineItem) -> Result<u32> {
        let transport = |e: JsValue| ConfiguratorError::from_js(ConfiguratorError::Transport, &e);
        let json = serde_json::to_string(item).map_err(|e| ConfiguratorError::Transport(e.to_string()))?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_body(&JsValue::from_str(&json));
        let request = Request::new_with_str_and_init(&self.cart_url, &init).map_err(transport)?;
        request.headers().set("Content-Type", "application/json").map_err(transport)?;

        log::info!("adding product {} x{} to cart", item.product_id, item.quantity);
        let body = self.send(request).await?;
        parse_cart_reply(&body)
    }
}
