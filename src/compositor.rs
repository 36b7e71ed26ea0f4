//! Two-layer scene: a locked product image behind one movable logo.
//!
//! The compositor only does placement arithmetic. Loading images and
//! drawing them is the job of a [`Surface`](crate::surface::Surface).

use crate::error::{ConfiguratorError, Result};
use crate::objects::Layer;
use crate::types::{Placement, SelectionStyle};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Zoom {
    In,
    Out,
}

#[derive(Clone, Debug)]
pub struct Compositor<I> {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub logo_max_size: f64,
    pub reset_scale: f64,
    pub zoom_step: f64,
    pub zoom_out_step: f64,
    pub background_color: String,
    pub selection: SelectionStyle,
    background: Option<Layer<I>>,
    overlay: Option<Layer<I>>,
}

impl<I> Compositor<I> {
    pub fn new(width: f64, height: f64) -> Compositor<I> {
        Compositor {
            width,
            height,
            margin: 20.0,
            logo_max_size: 150.0,
            reset_scale: 0.5,
            zoom_step: 1.1,
            zoom_out_step: 0.9,
            background_color: "#f5f5f5".to_string(),
            selection: SelectionStyle::default(),
            background: None,
            overlay: None,
        }
    }

    pub fn background(&self) -> Option<&Layer<I>> { self.background.as_ref() }
    pub fn overlay(&self) -> Option<&Layer<I>> { self.overlay.as_ref() }
    pub fn has_overlay(&self) -> bool { self.overlay.is_some() }

    /// Bottom to top.
    pub fn layers(&self) -> impl Iterator<Item = &Layer<I>> {
        self.background.iter().chain(self.overlay.iter())
    }

    /// Uniform scale that fits `w`×`h` inside the viewport minus its margin.
    pub fn fit_scale(&self, w: f64, h: f64) -> Result<f64> {
        check_size(w, h)?;
        Ok(((self.width - 2.0 * self.margin) / w).min((self.height - 2.0 * self.margin) / h))
    }

    /// Uniform scale that makes the longest side `logo_max_size`.
    pub fn logo_scale(&self, w: f64, h: f64) -> Result<f64> {
        check_size(w, h)?;
        Ok((self.logo_max_size / w).min(self.logo_max_size / h))
    }

    pub fn set_background(&mut self, image: I, w: f64, h: f64) -> Result<()> {
        let scale = self.fit_scale(w, h)?;
        let placement = Placement::centered(self.width, self.height, scale);
        self.background = Some(Layer::background(image, w, h, placement));
        Ok(())
    }

    pub fn clear_background(&mut self) -> Option<Layer<I>> {
        self.background.take()
    }

    /// Replaces any existing overlay with a centred one capped at `logo_max_size`.
    pub fn set_overlay(&mut self, image: I, w: f64, h: f64) -> Result<()> {
        let scale = self.logo_scale(w, h)?;
        self.overlay = None;
        let placement = Placement::centered(self.width, self.height, scale);
        self.overlay = Some(Layer::overlay(image, w, h, placement, self.selection.clone()));
        Ok(())
    }

    pub fn remove_overlay(&mut self) -> Option<Layer<I>> {
        self.overlay.take()
    }

    pub fn overlay_transform(&self) -> Option<Placement> {
        self.overlay.as_ref().map(|l| l.placement)
    }

    pub fn set_overlay_transform(&mut self, placement: Placement) -> bool {
        match self.overlay.as_mut() {
            Some(layer) => { layer.placement = placement; true }
            None => false,
        }
    }

    /// Recentre at `reset_scale` with no rotation.
    pub fn reset_overlay(&mut self) -> bool {
        let placement = Placement::centered(self.width, self.height, self.reset_scale);
        self.set_overlay_transform(placement)
    }

    /// Multiplies both axis scales by `zoom_step` or `zoom_out_step`. The
    /// steps are not reciprocal, so an in/out pair shrinks the logo by
    /// their product (0.99 with the defaults). No lower or upper bound.
    pub fn zoom_overlay(&mut self, zoom: Zoom) -> bool {
        let factor = match zoom {
            Zoom::In => self.zoom_step,
            Zoom::Out => self.zoom_out_step,
        };
        match self.overlay.as_mut() {
            Some(layer) => {
                layer.placement.scale_x *= factor;
                layer.placement.scale_y *= factor;
                true
            }
            None => false,
        }
    }
}

fn check_size(w: f64, h: f64) -> Result<()> {
    if w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite() {
        Ok(())
    } else {
        Err(ConfiguratorError::ImageLoad(format!("image has no usable size ({}x{})", w, h)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scene() -> Compositor<&'static str> {
        Compositor::new(500.0, 400.0)
    }

    #[test]
    fn background_fits_inside_margins() {
        let mut c = scene();
        c.set_background("mug", 920.0, 360.0).unwrap();
        let bg = c.background().unwrap();
        assert_eq!(bg.placement.scale_x, 0.5);
        assert_eq!(bg.placement.scale_y, 0.5);
        assert_eq!((bg.placement.left, bg.placement.top), (250.0, 200.0));
        assert!(!bg.interactive);
        assert!(bg.selection.is_none());
    }

    #[test]
    fn background_limited_by_height() {
        let mut c = scene();
        c.set_background("tall", 100.0, 720.0).unwrap();
        assert_eq!(c.background().unwrap().placement.scale_x, 0.5);
    }

    #[test]
    fn overlay_longest_side_is_capped() {
        let mut c = scene();
        c.set_overlay("logo", 600.0, 300.0).unwrap();
        let layer = c.overlay().unwrap();
        assert_eq!(layer.placement.scale_x, 0.25);
        assert!(layer.interactive);
        assert_eq!(layer.selection.as_ref().unwrap().corner_color, "#3498db");

        c.set_overlay("small", 50.0, 75.0).unwrap();
        assert_eq!(c.overlay().unwrap().placement.scale_x, 2.0);
        assert_eq!(c.layers().count(), 1);
    }

    #[test]
    fn replacing_the_overlay_keeps_a_single_instance() {
        let mut c = scene();
        c.set_background("mug", 400.0, 400.0).unwrap();
        c.set_overlay("a", 100.0, 100.0).unwrap();
        c.set_overlay("b", 100.0, 100.0).unwrap();
        let images: Vec<_> = c.layers().map(|l| l.image).collect();
        assert_eq!(images, vec!["mug", "b"]);
    }

    #[test]
    fn zero_sized_images_are_rejected() {
        let mut c = scene();
        assert!(c.set_overlay("broken", 0.0, 10.0).is_err());
        assert!(c.set_background("broken", 10.0, f64::NAN).is_err());
        assert!(!c.has_overlay());
    }

    #[test]
    fn reset_recentres_and_clears_rotation() {
        let mut c = scene();
        c.set_overlay("logo", 100.0, 100.0).unwrap();
        c.set_overlay_transform(Placement { left: 10.0, top: 20.0, scale_x: 3.0, scale_y: 1.0, angle: 45.0 });
        assert!(c.reset_overlay());
        assert_eq!(c.overlay_transform().unwrap(), Placement { left: 250.0, top: 200.0, scale_x: 0.5, scale_y: 0.5, angle: 0.0 });
    }

    #[test]
    fn zoom_out_multiplies_by_its_own_step() {
        let mut c = scene();
        c.set_overlay("logo", 150.0, 150.0).unwrap();
        assert_eq!(c.overlay_transform().unwrap().scale_x, 1.0);
        assert!(c.zoom_overlay(Zoom::Out));
        let out = c.overlay_transform().unwrap();
        assert!((out.scale_x - 0.9).abs() < 1e-12);
        assert_eq!(out.scale_x, out.scale_y);
    }

    #[test]
    fn zoom_in_then_out_drifts_by_the_step_product() {
        let mut c = scene();
        c.set_overlay("logo", 300.0, 150.0).unwrap();
        let start = c.overlay_transform().unwrap().scale_x;
        for _ in 0..7 { c.zoom_overlay(Zoom::In); }
        let zoomed = c.overlay_transform().unwrap();
        assert!((zoomed.scale_x - start * 1.1f64.powi(7)).abs() < 1e-9);
        assert_eq!(zoomed.scale_x, zoomed.scale_y);
        for _ in 0..7 { c.zoom_overlay(Zoom::Out); }
        let back = c.overlay_transform().unwrap().scale_x;
        assert!((back - start * 0.99f64.powi(7)).abs() < 1e-12);
    }

    #[test]
    fn manipulation_without_overlay_is_a_no_op() {
        let mut c = scene();
        assert!(!c.reset_overlay());
        assert!(!c.zoom_overlay(Zoom::In));
        assert!(c.overlay_transform().is_none());
        assert!(c.remove_overlay().is_none());
    }
}
