use kurbo::Point;
use crate::compositor::Compositor;
use crate::objects::Layer;
use crate::types::{HandleType, Placement};

/// An in-progress pointer gesture on the overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Drag {
    Move { start: Point, origin: Placement },
    Scale { start_dist: f64, origin: Placement },
    Rotate { start_angle: f64, origin: Placement },
}

pub fn hit_test_handles<I>(layer: &Layer<I>, x: f64, y: f64) -> Option<HandleType> {
    let style = layer.selection.as_ref()?;
    let radius = style.corner_size / 2.0 + 2.0;
    let [tl, tr, br, bl] = layer.corners();
    let handles = [
        (tl, HandleType::TopLeft), (tr, HandleType::TopRight),
        (bl, HandleType::BottomLeft), (br, HandleType::BottomRight),
        (layer.rotate_handle(style.rotate_offset), HandleType::Rotate),
    ];
    let p = Point::new(x, y);
    for (h, h_type) in handles {
        if h.distance(p) <= radius {
            return Some(h_type);
        }
    }
    None
}

/// Starts a gesture if `(x, y)` lands on the overlay or one of its handles.
pub fn begin_drag<I>(scene: &Compositor<I>, x: f64, y: f64) -> Option<Drag> {
    let layer = scene.overlay()?;
    if !layer.interactive { return None; }
    let origin = layer.placement;
    let centre = Point::new(origin.left, origin.top);
    let p = Point::new(x, y);
    match hit_test_handles(layer, x, y) {
        Some(HandleType::Rotate) => Some(Drag::Rotate { start_angle: angle_deg(centre, p), origin }),
        Some(_) => {
            let start_dist = centre.distance(p);
            if start_dist > 0.0 { Some(Drag::Scale { start_dist, origin }) } else { None }
        }
        None if layer.contains(x, y) => Some(Drag::Move { start: p, origin }),
        None => None,
    }
}

/// Placement the overlay should take with the pointer at `(x, y)`.
pub fn drag_to(drag: &Drag, x: f64, y: f64) -> Placement {
    let p = Point::new(x, y);
    match *drag {
        Drag::Move { start, origin } => Placement {
            left: origin.left + (p.x - start.x),
            top: origin.top + (p.y - start.y),
            ..origin
        },
        Drag::Scale { start_dist, origin } => {
            let factor = Point::new(origin.left, origin.top).distance(p) / start_dist;
            Placement { scale_x: origin.scale_x * factor, scale_y: origin.scale_y * factor, ..origin }
        }
        Drag::Rotate { start_angle, origin } => {
            let delta = angle_deg(Point::new(origin.left, origin.top), p) - start_angle;
            Placement { angle: (origin.angle + delta).rem_euclid(360.0), ..origin }
        }
    }
}

fn angle_deg(centre: Point, p: Point) -> f64 {
    (p.y - centre.y).atan2(p.x - centre.x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scene() -> Compositor<()> {
        let mut c = Compositor::new(400.0, 400.0);
        c.set_overlay((), 150.0, 150.0).unwrap();
        c
    }

    #[test]
    fn dragging_the_body_moves_the_logo() {
        let c = scene();
        let drag = begin_drag(&c, 210.0, 190.0).unwrap();
        assert!(matches!(drag, Drag::Move { .. }));
        let p = drag_to(&drag, 260.0, 170.0);
        assert_eq!((p.left, p.top), (250.0, 180.0));
        assert_eq!(p.scale_x, 1.0);
    }

    #[test]
    fn dragging_a_corner_scales_uniformly() {
        let c = scene();
        // Bottom-right corner of a 150x150 logo centred at (200, 200).
        let drag = begin_drag(&c, 275.0, 275.0).unwrap();
        assert!(matches!(drag, Drag::Scale { .. }));
        let p = drag_to(&drag, 350.0, 350.0);
        assert!((p.scale_x - 2.0).abs() < 1e-9);
        assert_eq!(p.scale_x, p.scale_y);
    }

    #[test]
    fn dragging_the_rotate_handle_turns_the_logo() {
        let c = scene();
        // Handle sits 40 above the top edge at y = 125.
        let drag = begin_drag(&c, 200.0, 85.0).unwrap();
        assert!(matches!(drag, Drag::Rotate { .. }));
        let p = drag_to(&drag, 315.0, 200.0);
        assert!((p.angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn clicks_outside_start_nothing() {
        let c = scene();
        assert!(begin_drag(&c, 10.0, 10.0).is_none());
        let empty: Compositor<()> = Compositor::new(400.0, 400.0);
        assert!(begin_drag(&empty, 200.0, 200.0).is_none());
    }
}
