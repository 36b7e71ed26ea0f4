use async_trait::async_trait;
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::compositor::Compositor;
use crate::error::{ConfiguratorError, Result};
use crate::objects::Layer;
use crate::surface::Surface;
use crate::types::PreviewFormat;

/// Draws the scene onto a page `<canvas>`.
pub struct WebSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<WebSurface> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| ConfiguratorError::from_js(ConfiguratorError::Canvas, &e))?
            .ok_or_else(|| ConfiguratorError::Canvas("2d context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| ConfiguratorError::Canvas("context is not 2d".to_string()))?;
        Ok(WebSurface { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement { &self.canvas }

    pub fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn draw(&self, scene: &Compositor<HtmlImageElement>, with_selection: bool) -> std::result::Result<(), JsValue> {
        let ctx = &self.ctx;
        let (w, h) = self.size();
        ctx.save();
        ctx.clear_rect(0.0, 0.0, w, h);
        ctx.set_fill_style_str(&scene.background_color);
        ctx.fill_rect(0.0, 0.0, w, h);

        for layer in scene.layers() {
            self.draw_layer(layer)?;
        }
        if with_selection {
            if let Some(layer) = scene.overlay() {
                self.draw_selection(layer)?;
            }
        }
        ctx.restore();
        Ok(())
    }

    fn draw_layer(&self, layer: &Layer<HtmlImageElement>) -> std::result::Result<(), JsValue> {
        let ctx = &self.ctx;
        let p = &layer.placement;
        ctx.save();
        ctx.translate(p.left, p.top)?;
        ctx.rotate(p.angle.to_radians())?;
        ctx.scale(p.scale_x, p.scale_y)?;
        ctx.draw_image_with_html_image_element_and_dw_and_dh(
            &layer.image,
            -layer.width / 2.0,
            -layer.height / 2.0,
            layer.width,
            layer.height,
        )?;
        ctx.restore();
        Ok(())
    }

    // Frame and handles are drawn in viewport space so line widths don't scale with the logo.
    fn draw_selection(&self, layer: &Layer<HtmlImageElement>) -> std::result::Result<(), JsValue> {
        let style = match &layer.selection {
            Some(s) => s,
            None => return Ok(()),
        };
        let ctx = &self.ctx;
        let [tl, tr, br, bl] = layer.corners();
        let handle = layer.rotate_handle(style.rotate_offset);
        let top_mid = tl.midpoint(tr);

        ctx.save();
        ctx.set_line_dash(&js_sys::Array::new())?;
        ctx.set_stroke_style_str(&style.border_color);
        ctx.set_line_width(style.border_scale_factor);
        ctx.begin_path();
        ctx.move_to(tl.x, tl.y);
        ctx.line_to(tr.x, tr.y);
        ctx.line_to(br.x, br.y);
        ctx.line_to(bl.x, bl.y);
        ctx.close_path();
        ctx.stroke();

        ctx.begin_path();
        ctx.move_to(top_mid.x, top_mid.y);
        ctx.line_to(handle.x, handle.y);
        ctx.stroke();

        let size = style.corner_size;
        ctx.set_fill_style_str(&style.corner_color);
        ctx.set_stroke_style_str(&style.corner_color);
        ctx.set_line_width(1.0);
        for c in [tl, tr, br, bl] {
            ctx.begin_path();
            ctx.rect(c.x - size / 2.0, c.y - size / 2.0, size, size);
            if !style.transparent_corners { ctx.fill(); }
            ctx.stroke();
        }
        ctx.begin_path();
        ctx.arc(handle.x, handle.y, size / 2.0, 0.0, std::f64::consts::PI * 2.0)?;
        if !style.transparent_corners { ctx.fill(); }
        ctx.stroke();
        ctx.restore();
        Ok(())
    }
}

async fn load_html_image(url: &str) -> Result<HtmlImageElement> {
    let img = HtmlImageElement::new().map_err(|e| ConfiguratorError::from_js(ConfiguratorError::ImageLoad, &e))?;
    img.set_cross_origin(Some("anonymous"));

    let promise = Promise::new(&mut |resolve, reject| {
        let onload = Closure::once_into_js(move || {
            let _ = resolve.call0(&JsValue::NULL);
        });
        let onerror = Closure::once_into_js(move || {
            let _ = reject.call0(&JsValue::NULL);
        });
        img.set_onload(Some(onload.unchecked_ref()));
        img.set_onerror(Some(onerror.unchecked_ref()));
    });
    img.set_src(url);

    let loaded = JsFuture::from(promise).await;
    img.set_onload(None);
    img.set_onerror(None);
    loaded.map_err(|_| ConfiguratorError::ImageLoad(url.to_string()))?;
    Ok(img)
}

#[async_trait(?Send)]
impl Surface for WebSurface {
    type Image = HtmlImageElement;

    async fn load_image(&self, url: &str) -> Result<HtmlImageElement> {
        load_html_image(url).await
    }

    fn image_size(&self, image: &HtmlImageElement) -> (f64, f64) {
        (image.natural_width() as f64, image.natural_height() as f64)
    }

    fn render(&self, scene: &Compositor<HtmlImageElement>) {
        if let Err(e) = self.draw(scene, true) {
            log::error!("canvas render failed: {:?}", e);
        }
    }

    fn snapshot(&self, scene: &Compositor<HtmlImageElement>, format: PreviewFormat, quality: f64) -> Result<String> {
        let to_err = |e: JsValue| ConfiguratorError::from_js(ConfiguratorError::Canvas, &e);
        self.draw(scene, false).map_err(to_err)?;
        let url = self
            .canvas
            .to_data_url_with_type_and_encoder_options(format.mime(), &JsValue::from_f64(quality))
            .map_err(to_err);
        self.render(scene);
        url
    }
}
