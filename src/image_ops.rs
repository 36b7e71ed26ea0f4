//! Headless surface: composites the scene in memory with the `image` crate.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::Cursor;
use std::rc::Rc;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use kurbo::Point;

use crate::compositor::Compositor;
use crate::error::{ConfiguratorError, Result};
use crate::objects::Layer;
use crate::surface::Surface;
use crate::svg::svg_intrinsic_size;
use crate::types::PreviewFormat;

pub type RasterImage = Rc<RgbaImage>;

/// Images come from registered bytes keyed by URL, or from `data:` URLs.
#[derive(Default)]
pub struct RasterSurface {
    assets: RefCell<HashMap<String, Vec<u8>>>,
    frames: Cell<usize>,
    #[cfg(test)]
    load_hooks: RefCell<HashMap<String, Box<dyn FnOnce()>>>,
}

impl RasterSurface {
    pub fn new() -> RasterSurface {
        RasterSurface::default()
    }

    pub fn register(&self, url: &str, bytes: Vec<u8>) {
        self.assets.borrow_mut().insert(url.to_string(), bytes);
    }

    /// Number of `render` calls so far.
    pub fn frames(&self) -> usize {
        self.frames.get()
    }

    /// Runs `hook` once, while the next load of `url` is still pending.
    #[cfg(test)]
    pub(crate) fn during_load(&self, url: &str, hook: impl FnOnce() + 'static) {
        self.load_hooks.borrow_mut().insert(url.to_string(), Box::new(hook));
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(rest) = url.strip_prefix("data:") {
            let (meta, payload) = rest
                .split_once(',')
                .ok_or_else(|| ConfiguratorError::ImageLoad("data URL without payload".to_string()))?;
            if !meta.ends_with(";base64") {
                return Ok(payload.as_bytes().to_vec());
            }
            return general_purpose::STANDARD
                .decode(payload)
                .map_err(|e| ConfiguratorError::ImageLoad(format!("bad base64 in data URL: {}", e)));
        }
        self.assets
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| ConfiguratorError::ImageLoad(format!("{} not found", url)))
    }

    /// Full scene, no selection frame.
    pub fn composite(&self, scene: &Compositor<RasterImage>) -> RgbaImage {
        let width = scene.width.round().max(1.0) as u32;
        let height = scene.height.round().max(1.0) as u32;
        let mut canvas = RgbaImage::from_pixel(width, height, parse_hex_color(&scene.background_color));
        for layer in scene.layers() {
            draw_layer(&mut canvas, layer);
        }
        canvas
    }
}

fn decode(bytes: &[u8]) -> Result<RgbaImage> {
    match image::load_from_memory(bytes) {
        Ok(img) => Ok(img.to_rgba8()),
        Err(e) => match svg_intrinsic_size(bytes) {
            // Vector logos are measured but not rasterized; draw a placeholder box.
            Some((w, h)) => Ok(RgbaImage::from_pixel(w.round().max(1.0) as u32, h.round().max(1.0) as u32, Rgba([0xcc, 0xcc, 0xcc, 0xff]))),
            None => Err(ConfiguratorError::ImageLoad(e.to_string())),
        },
    }
}

fn parse_hex_color(color: &str) -> Rgba<u8> {
    match u32::from_str_radix(color.trim_start_matches('#'), 16) {
        Ok(c) => Rgba([((c >> 16) & 0xff) as u8, ((c >> 8) & 0xff) as u8, (c & 0xff) as u8, 255]),
        Err(_) => Rgba([255, 255, 255, 255]),
    }
}

/// Nearest-neighbour resample through the inverse of the layer transform.
fn draw_layer(canvas: &mut RgbaImage, layer: &Layer<RasterImage>) {
    let src = &layer.image;
    if src.width() == 0 || src.height() == 0 { return; }
    let (min_x, min_y, max_x, max_y) = layer.world_bounds();
    let x0 = min_x.floor().max(0.0) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let x1 = (max_x.ceil().max(0.0) as u32).min(canvas.width());
    let y1 = (max_y.ceil().max(0.0) as u32).min(canvas.height());
    let inverse = layer.affine().inverse();
    let sx = src.width() as f64 / layer.width;
    let sy = src.height() as f64 / layer.height;

    for y in y0..y1 {
        for x in x0..x1 {
            let local = inverse * Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let u = ((local.x + layer.width / 2.0) * sx).floor();
            let v = ((local.y + layer.height / 2.0) * sy).floor();
            if u < 0.0 || v < 0.0 || u >= src.width() as f64 || v >= src.height() as f64 { continue; }
            let top = src.get_pixel(u as u32, v as u32);
            let dst = canvas.get_pixel_mut(x, y);
            *dst = blend(*dst, *top);
        }
    }
}

fn blend(under: Rgba<u8>, over: Rgba<u8>) -> Rgba<u8> {
    let a = over[3] as f64 / 255.0;
    if a >= 1.0 { return over; }
    if a <= 0.0 { return under; }
    let b = under[3] as f64 / 255.0;
    let out_a = a + b * (1.0 - a);
    let mut px = [0u8; 4];
    for i in 0..3 {
        let c = (over[i] as f64 * a + under[i] as f64 * b * (1.0 - a)) / out_a;
        px[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    px[3] = (out_a * 255.0).round() as u8;
    Rgba(px)
}

#[async_trait(?Send)]
impl Surface for RasterSurface {
    type Image = RasterImage;

    async fn load_image(&self, url: &str) -> Result<RasterImage> {
        #[cfg(test)]
        {
            let hook = self.load_hooks.borrow_mut().remove(url);
            if let Some(hook) = hook {
                hook();
            }
        }
        let bytes = self.fetch(url)?;
        Ok(Rc::new(decode(&bytes)?))
    }

    fn image_size(&self, image: &RasterImage) -> (f64, f64) {
        (image.width() as f64, image.height() as f64)
    }

    fn render(&self, _scene: &Compositor<RasterImage>) {
        self.frames.set(self.frames.get() + 1);
    }

    fn snapshot(&self, scene: &Compositor<RasterImage>, format: PreviewFormat, quality: f64) -> Result<String> {
        let img = DynamicImage::ImageRgba8(self.composite(scene));
        let mut bytes: Vec<u8> = Vec::new();
        let written = match format {
            PreviewFormat::Png => img.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png),
            PreviewFormat::Jpeg => {
                let q = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
                DynamicImage::ImageRgb8(img.to_rgb8()).write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Jpeg(q))
            }
        };
        written.map_err(|e| ConfiguratorError::Canvas(e.to_string()))?;
        let b64 = general_purpose::STANDARD.encode(&bytes);
        Ok(format!("data:{};base64,{}", format.mime(), b64))
    }
}
