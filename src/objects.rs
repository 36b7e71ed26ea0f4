use kurbo::{Affine, Point};
use crate::types::{Placement, SelectionStyle};

/// One image in the scene. `width`/`height` are the image's natural size;
/// `placement` maps its centre to the viewport.
#[derive(Clone, Debug)]
pub struct Layer<I> {
    pub image: I,
    pub width: f64,
    pub height: f64,
    pub placement: Placement,
    pub interactive: bool,
    pub selection: Option<SelectionStyle>,
}

impl<I> Layer<I> {
    pub fn background(image: I, width: f64, height: f64, placement: Placement) -> Layer<I> {
        Layer { image, width, height, placement, interactive: false, selection: None }
    }

    pub fn overlay(image: I, width: f64, height: f64, placement: Placement, style: SelectionStyle) -> Layer<I> {
        Layer { image, width, height, placement, interactive: true, selection: Some(style) }
    }

    /// Image space (origin at the image centre) to viewport space.
    pub fn affine(&self) -> Affine {
        let p = &self.placement;
        Affine::translate((p.left, p.top))
            * Affine::rotate(p.angle.to_radians())
            * Affine::scale_non_uniform(p.scale_x, p.scale_y)
    }

    /// Viewport point in the layer's unscaled, unrotated frame, relative to its centre.
    pub fn to_local(&self, x: f64, y: f64) -> Point {
        let p = &self.placement;
        let dx = x - p.left;
        let dy = y - p.top;
        let rad = (-p.angle).to_radians();
        let (sin_r, cos_r) = rad.sin_cos();
        let rx = dx * cos_r - dy * sin_r;
        let ry = dx * sin_r + dy * cos_r;
        Point::new(rx / p.scale_x, ry / p.scale_y)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        if self.placement.scale_x == 0.0 || self.placement.scale_y == 0.0 { return false; }
        let local = self.to_local(x, y);
        local.x.abs() <= self.width / 2.0 && local.y.abs() <= self.height / 2.0
    }

    /// Corners in viewport space: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        let affine = self.affine();
        [
            affine * Point::new(-hw, -hh),
            affine * Point::new(hw, -hh),
            affine * Point::new(hw, hh),
            affine * Point::new(-hw, hh),
        ]
    }

    pub fn world_bounds(&self) -> (f64, f64, f64, f64) {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for c in self.corners() {
            if c.x < min_x { min_x = c.x; }
            if c.x > max_x { max_x = c.x; }
            if c.y < min_y { min_y = c.y; }
            if c.y > max_y { max_y = c.y; }
        }
        (min_x, min_y, max_x, max_y)
    }

    /// Where the rotation handle sits: above the top edge, along the layer's own up axis.
    pub fn rotate_handle(&self, offset: f64) -> Point {
        let [tl, tr, _, _] = self.corners();
        let mid = tl.midpoint(tr);
        let rad = self.placement.angle.to_radians();
        Point::new(mid.x + offset * rad.sin(), mid.y - offset * rad.cos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(angle: f64) -> Layer<()> {
        Layer::overlay((), 100.0, 50.0, Placement { left: 200.0, top: 100.0, scale_x: 2.0, scale_y: 2.0, angle }, SelectionStyle::default())
    }

    #[test]
    fn corners_follow_scale() {
        let l = layer(0.0);
        let [tl, _, br, _] = l.corners();
        assert!((tl.x - 100.0).abs() < 1e-9 && (tl.y - 50.0).abs() < 1e-9);
        assert!((br.x - 300.0).abs() < 1e-9 && (br.y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn hit_test_respects_rotation() {
        let l = layer(90.0);
        // Rotated a quarter turn the layer is 100 wide and 200 tall on screen.
        assert!(l.contains(200.0, 190.0));
        assert!(!l.contains(290.0, 100.0));
    }

    #[test]
    fn to_local_inverts_affine() {
        let l = layer(33.0);
        let world = l.affine() * Point::new(12.0, -7.0);
        let back = l.to_local(world.x, world.y);
        assert!((back.x - 12.0).abs() < 1e-9);
        assert!((back.y + 7.0).abs() < 1e-9);
    }

    #[test]
    fn rotate_handle_sits_above_top_edge() {
        let l = layer(0.0);
        let h = l.rotate_handle(40.0);
        assert!((h.x - 200.0).abs() < 1e-9);
        assert!((h.y - 10.0).abs() < 1e-9);
    }
}
