//! Pointer-proximity zoom
//!
//! Computes the zoom factor applied to an icon's displayed size from
//! the pointer position, the docked edge, and the icon's state. The
//! axis-selection conditions are deliberately asymmetric between
//! opposite edges; they are the contract, covered by table tests.

use crate::config::Edge;

/// Upper bound of every zoom factor.
pub const MAX_ZOOM: f64 = 1.5;

/// Inputs to one zoom computation.
#[derive(Debug, Clone, Copy)]
pub struct ZoomInput {
    /// Pointer position relative to the icon's top-left corner.
    pub pointer_x: f64,
    pub pointer_y: f64,
    /// Half the maximum icon size.
    pub half_size: f64,
    pub edge: Edge,
    pub effects: bool,
    pub mouse_over: bool,
    /// True while a context menu is open for the icon.
    pub menu_open: bool,
    /// The icon's base zoom factor (1.0 nominal, 0.66 minimized).
    pub base_factor: f64,
}

/// Compute the zoom factor for one icon.
///
/// An open context menu pins the zoom at the maximum. Otherwise, with
/// effects on and the pointer over the icon, a parabolic falloff along
/// each axis produces a localized bump near the cursor; the docked
/// edge decides whether a single axis or the product of both applies.
/// The result is always within `[0.0, MAX_ZOOM]`.
pub fn compute_zoom(input: &ZoomInput) -> f64 {
    if input.menu_open {
        return MAX_ZOOM;
    }
    let zoom = if input.effects && input.mouse_over {
        let h = input.half_size;
        let fract_x = falloff(input.pointer_x, h);
        let fract_y = falloff(input.pointer_y, h);
        let fract = match input.edge {
            Edge::Top if input.pointer_y < h => fract_x,
            Edge::Bottom if input.pointer_y > h => fract_x,
            Edge::Left if input.pointer_x < h => fract_y,
            Edge::Right if input.pointer_x > h => fract_y,
            _ => fract_x * fract_y,
        };
        input.base_factor * (1.0 + fract / 2.0)
    } else {
        input.base_factor
    };
    zoom.clamp(0.0, MAX_ZOOM)
}

/// Parabolic falloff along one axis: 1.0 with the pointer at the icon
/// center, 0.0 at the edges, clamped to never go negative.
fn falloff(p: f64, h: f64) -> f64 {
    if h <= 0.0 {
        return 0.0;
    }
    let fract = (h - (1.0 / h) * (p - h).powi(2)) / h;
    fract.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(edge: Edge, px: f64, py: f64) -> ZoomInput {
        ZoomInput {
            pointer_x: px,
            pointer_y: py,
            half_size: 24.0,
            edge,
            effects: true,
            mouse_over: true,
            menu_open: false,
            base_factor: 1.0,
        }
    }

    #[test]
    fn test_menu_open_pins_max_zoom() {
        let mut i = input(Edge::Bottom, 0.0, 0.0);
        i.menu_open = true;
        i.effects = false;
        i.mouse_over = false;
        assert_eq!(compute_zoom(&i), MAX_ZOOM);
    }

    #[test]
    fn test_base_factor_without_effects() {
        let mut i = input(Edge::Bottom, 24.0, 24.0);
        i.effects = false;
        assert_eq!(compute_zoom(&i), 1.0);

        i.base_factor = 0.66;
        assert_eq!(compute_zoom(&i), 0.66);
    }

    #[test]
    fn test_base_factor_without_mouse_over() {
        let mut i = input(Edge::Bottom, 24.0, 24.0);
        i.mouse_over = false;
        assert_eq!(compute_zoom(&i), 1.0);
    }

    #[test]
    fn test_center_pointer_gives_full_bump() {
        // Pointer dead center: both falloffs are 1.0, so every branch
        // yields base * 1.5.
        for edge in [Edge::None, Edge::Top, Edge::Bottom, Edge::Left, Edge::Right] {
            let z = compute_zoom(&input(edge, 24.0, 24.0));
            assert!((z - 1.5).abs() < 1e-9, "{edge}: {z}");
        }
    }

    #[test]
    fn test_axis_selection_table() {
        // For each edge, approaching from the docked side uses the
        // single-axis factor; anywhere else the product applies.
        let cases = [
            // (edge, px, py, expected fract)
            (Edge::Top, 12.0, 10.0, falloff_at(12.0)), // py < h: x-factor only
            (Edge::Top, 12.0, 30.0, falloff_at(12.0) * falloff_at(30.0)),
            (Edge::Bottom, 12.0, 30.0, falloff_at(12.0)), // py > h: x-factor only
            (Edge::Bottom, 12.0, 10.0, falloff_at(12.0) * falloff_at(10.0)),
            (Edge::Left, 10.0, 12.0, falloff_at(12.0)), // px < h: y-factor only
            (Edge::Left, 30.0, 12.0, falloff_at(30.0) * falloff_at(12.0)),
            (Edge::Right, 30.0, 12.0, falloff_at(12.0)), // px > h: y-factor only
            (Edge::Right, 10.0, 12.0, falloff_at(10.0) * falloff_at(12.0)),
            (Edge::None, 12.0, 30.0, falloff_at(12.0) * falloff_at(30.0)),
        ];
        for (edge, px, py, fract) in cases {
            let expected = (1.0 + fract / 2.0).clamp(0.0, MAX_ZOOM);
            let z = compute_zoom(&input(edge, px, py));
            assert!(
                (z - expected).abs() < 1e-9,
                "{edge} at ({px},{py}): got {z}, expected {expected}"
            );
        }

        fn falloff_at(p: f64) -> f64 {
            let h = 24.0;
            ((h - (1.0 / h) * (p - h).powi(2)) / h).max(0.0)
        }
    }

    #[test]
    fn test_bounds_for_arbitrary_pointers() {
        let pointers = [
            (-1000.0, -1000.0),
            (0.0, 0.0),
            (24.0, 24.0),
            (48.0, 48.0),
            (72.0, 72.0),
            (1e6, -1e6),
            (f64::MAX / 2.0, 0.0),
        ];
        for edge in [Edge::None, Edge::Top, Edge::Bottom, Edge::Left, Edge::Right] {
            for (px, py) in pointers {
                for base in [0.0, 0.66, 1.0, 1.5] {
                    let mut i = input(edge, px, py);
                    i.base_factor = base;
                    let z = compute_zoom(&i);
                    assert!(
                        (0.0..=MAX_ZOOM).contains(&z),
                        "{edge} ({px},{py}) base {base}: {z} out of bounds"
                    );
                }
            }
        }
    }

    #[test]
    fn test_far_pointer_gives_no_bump() {
        // Both axis factors clamp to zero far outside the icon, so the
        // bump vanishes instead of inflating through a negative
        // product.
        let z = compute_zoom(&input(Edge::None, 72.0, 72.0));
        assert!((z - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_half_size() {
        let mut i = input(Edge::Bottom, 5.0, 5.0);
        i.half_size = 0.0;
        let z = compute_zoom(&i);
        assert!((0.0..=MAX_ZOOM).contains(&z));
    }
}
