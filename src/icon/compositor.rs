//! Icon compositing
//!
//! Builds the displayed raster for an icon: a transient canvas sized
//! from the animation phase and orientation, the scaled base image
//! centered on it, an emblem badge pinned to the top-left corner, and
//! a directional arrow anchored against the docked edge.

use image::{Rgba, RgbaImage};

use crate::config::Edge;

/// Source pixbufs larger than this (in either dimension) are scaled
/// down up front to speed up later per-frame scaling.
pub const MAX_SOURCE_SIZE: u32 = 128;

const ARROW_COLOR: Rgba<u8> = Rgba([200, 200, 210, 255]);
const ARROW_SPAN: u32 = 7;
const ARROW_DEPTH: u32 = 4;

/// Composites animation frames onto a cached canvas.
///
/// The canvas buffer is reallocated only when its required dimensions
/// change between frames.
#[derive(Default)]
pub struct Compositor {
    canvas: Option<RgbaImage>,
}

/// Everything one frame needs: images, their current alphas, and the
/// geometry inputs that drive the canvas dimensions.
pub struct Frame<'a> {
    pub base: &'a RgbaImage,
    pub base_alpha: u8,
    pub emblem: Option<&'a RgbaImage>,
    pub emblem_alpha: u8,
    pub arrow: Option<&'a RgbaImage>,
    pub arrow_alpha: u8,
    pub edge: Edge,
    /// True while the animation phase is idle.
    pub idle: bool,
    pub current_size: u32,
    pub max_size: u32,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render one frame and return the canvas.
    pub fn render(&mut self, frame: &Frame<'_>) -> &RgbaImage {
        let emblem_visible = frame.emblem.is_some() && frame.emblem_alpha > 0;
        let (width, height) = canvas_size(
            frame.idle,
            emblem_visible,
            frame.edge,
            frame.current_size,
            frame.max_size,
        );

        let reuse = self
            .canvas
            .as_ref()
            .is_some_and(|c| c.width() == width && c.height() == height);
        if !reuse {
            self.canvas = Some(RgbaImage::new(width, height));
        }
        let canvas = self.canvas.as_mut().expect("canvas allocated above");

        // Fully transparent black.
        for pixel in canvas.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }

        let x = centered(width, frame.base.width());
        let y = centered(height, frame.base.height());
        composite_over(canvas, frame.base, x, y, frame.base_alpha);

        if let Some(emblem) = frame.emblem {
            if frame.emblem_alpha > 0 {
                composite_over(canvas, emblem, 0, 0, frame.emblem_alpha);
            }
        }

        if let Some(arrow) = frame.arrow {
            if frame.arrow_alpha > 0 {
                let (ax, ay) =
                    arrow_anchor(frame.edge, width, height, arrow.width(), arrow.height());
                composite_over(canvas, arrow, ax, ay, frame.arrow_alpha);
            }
        }

        canvas
    }
}

/// Canvas dimensions for one frame.
///
/// A full `max_size` square while idle or while an emblem shows (the
/// emblem sits in a fixed corner); otherwise the minor axis tracks the
/// collapse at 1.5x the current size, capped at `max_size`.
pub fn canvas_size(
    idle: bool,
    emblem_visible: bool,
    edge: Edge,
    current_size: u32,
    max_size: u32,
) -> (u32, u32) {
    if idle || emblem_visible {
        return (max_size, max_size);
    }
    let tracked = (current_size * 3 / 2).min(max_size).max(1);
    if edge.is_vertical() {
        (max_size, tracked)
    } else {
        (tracked, max_size)
    }
}

/// Arrow anchor: centered on the axis perpendicular to the edge, flush
/// against the edge-facing side of the canvas.
pub fn arrow_anchor(
    edge: Edge,
    canvas_w: u32,
    canvas_h: u32,
    arrow_w: u32,
    arrow_h: u32,
) -> (i64, i64) {
    match edge {
        Edge::None | Edge::Top | Edge::Bottom => {
            let x = (canvas_w / 2) as i64 - (arrow_w / 2) as i64;
            let y = if edge == Edge::Top {
                canvas_h as i64 - arrow_h as i64
            } else {
                0
            };
            (x, y)
        }
        Edge::Left | Edge::Right => {
            let y = (canvas_h / 2) as i64 - (arrow_h / 2) as i64;
            let x = if edge == Edge::Left {
                canvas_w as i64 - arrow_w as i64
            } else {
                0
            };
            (x, y)
        }
    }
}

/// Scale a pixbuf so its larger dimension maps to `size`, preserving
/// aspect ratio; the other dimension is floored at 1 px. With
/// `scale_up` false the image is only ever shrunk.
pub fn scale_to_size(pixbuf: &RgbaImage, size: u32, scale_up: bool) -> RgbaImage {
    let size = size.max(1);
    let width = pixbuf.width();
    let height = pixbuf.height();
    if width > height {
        if width > size || (width < size && scale_up) {
            let ratio = height as f64 / width as f64;
            let new_height = ((size as f64 * ratio) as u32).max(1);
            return image::imageops::resize(
                pixbuf,
                size,
                new_height,
                image::imageops::FilterType::Triangle,
            );
        }
    } else if height > size || (height < size && scale_up) {
        let ratio = width as f64 / height as f64;
        let new_width = ((size as f64 * ratio) as u32).max(1);
        return image::imageops::resize(
            pixbuf,
            new_width,
            size,
            image::imageops::FilterType::Triangle,
        );
    }
    pixbuf.clone()
}

/// Composite `src` over `canvas` at `(x, y)` with an extra alpha
/// multiplier applied to every source pixel. Straight-alpha "over".
pub fn composite_over(canvas: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64, alpha: u8) {
    if alpha == 0 {
        return;
    }
    for (sx, sy, pixel) in src.enumerate_pixels() {
        let cx = x + sx as i64;
        let cy = y + sy as i64;
        if cx < 0 || cy < 0 || cx >= canvas.width() as i64 || cy >= canvas.height() as i64 {
            continue;
        }
        let scaled = Rgba([
            pixel[0],
            pixel[1],
            pixel[2],
            (pixel[3] as u16 * alpha as u16 / 255) as u8,
        ]);
        let base = canvas.get_pixel(cx as u32, cy as u32);
        let blended = blend_alpha(base, &scaled);
        canvas.put_pixel(cx as u32, cy as u32, blended);
    }
}

/// Blend two straight-alpha colors.
fn blend_alpha(base: &Rgba<u8>, overlay: &Rgba<u8>) -> Rgba<u8> {
    let oa = overlay[3] as f32 / 255.0;
    let ba = base[3] as f32 / 255.0;

    if oa < 0.01 {
        return *base;
    }

    let out_a = oa + ba * (1.0 - oa);
    if out_a < 0.01 {
        return Rgba([0, 0, 0, 0]);
    }

    let r = (overlay[0] as f32 * oa + base[0] as f32 * ba * (1.0 - oa)) / out_a;
    let g = (overlay[1] as f32 * oa + base[1] as f32 * ba * (1.0 - oa)) / out_a;
    let b = (overlay[2] as f32 * oa + base[2] as f32 * ba * (1.0 - oa)) / out_a;

    Rgba([r as u8, g as u8, b as u8, (out_a * 255.0) as u8])
}

/// Build the arrow pixbuf for an edge: a left tray gets a
/// right-pointing arrow, a right tray a left-pointing one, a top tray
/// a down-pointing one, anything else an up-pointing one.
pub fn arrow_pixbuf(edge: Edge) -> RgbaImage {
    match edge {
        Edge::Left => triangle(ARROW_DEPTH, ARROW_SPAN, |x, y| {
            y >= x && y <= ARROW_SPAN - 1 - x
        }),
        Edge::Right => triangle(ARROW_DEPTH, ARROW_SPAN, |x, y| {
            let x = ARROW_DEPTH - 1 - x;
            y >= x && y <= ARROW_SPAN - 1 - x
        }),
        Edge::Top => triangle(ARROW_SPAN, ARROW_DEPTH, |x, y| {
            x >= y && x <= ARROW_SPAN - 1 - y
        }),
        Edge::Bottom | Edge::None => triangle(ARROW_SPAN, ARROW_DEPTH, |x, y| {
            let y = ARROW_DEPTH - 1 - y;
            x >= y && x <= ARROW_SPAN - 1 - y
        }),
    }
}

fn triangle(width: u32, height: u32, inside: impl Fn(u32, u32) -> bool) -> RgbaImage {
    let mut img = RgbaImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = if inside(x, y) {
            ARROW_COLOR
        } else {
            Rgba([0, 0, 0, 0])
        };
    }
    img
}

/// Center `inner` inside `outer`, rounding each midpoint half-up.
fn centered(outer: u32, inner: u32) -> i64 {
    ((outer + 1) / 2) as i64 - ((inner + 1) / 2) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(color))
    }

    #[test]
    fn test_canvas_full_square_while_idle() {
        assert_eq!(canvas_size(true, false, Edge::Top, 5, 48), (48, 48));
        assert_eq!(canvas_size(true, false, Edge::Left, 5, 48), (48, 48));
    }

    #[test]
    fn test_canvas_full_square_while_emblem_visible() {
        assert_eq!(canvas_size(false, true, Edge::Top, 5, 48), (48, 48));
    }

    #[test]
    fn test_canvas_tracks_collapse_along_minor_axis() {
        // Horizontal trays shrink the width; vertical trays the height.
        assert_eq!(canvas_size(false, false, Edge::Bottom, 10, 48), (15, 48));
        assert_eq!(canvas_size(false, false, Edge::None, 10, 48), (15, 48));
        assert_eq!(canvas_size(false, false, Edge::Left, 10, 48), (48, 15));
        // Capped at max_size.
        assert_eq!(canvas_size(false, false, Edge::Bottom, 40, 48), (48, 48));
    }

    #[test]
    fn test_arrow_anchor_per_edge() {
        // 48x48 canvas, 7x4 horizontal arrow, 4x7 vertical arrow.
        assert_eq!(arrow_anchor(Edge::Bottom, 48, 48, 7, 4), (21, 0));
        assert_eq!(arrow_anchor(Edge::None, 48, 48, 7, 4), (21, 0));
        assert_eq!(arrow_anchor(Edge::Top, 48, 48, 7, 4), (21, 44));
        assert_eq!(arrow_anchor(Edge::Right, 48, 48, 4, 7), (0, 21));
        assert_eq!(arrow_anchor(Edge::Left, 48, 48, 4, 7), (44, 21));
    }

    #[test]
    fn test_scale_larger_dimension_as_reference() {
        let wide = solid(100, 50, [255, 0, 0, 255]);
        let scaled = scale_to_size(&wide, 32, true);
        assert_eq!((scaled.width(), scaled.height()), (32, 16));

        let tall = solid(50, 100, [255, 0, 0, 255]);
        let scaled = scale_to_size(&tall, 32, true);
        assert_eq!((scaled.width(), scaled.height()), (16, 32));
    }

    #[test]
    fn test_scale_floors_at_one_pixel() {
        let sliver = solid(200, 2, [255, 0, 0, 255]);
        let scaled = scale_to_size(&sliver, 10, true);
        assert_eq!((scaled.width(), scaled.height()), (10, 1));
    }

    #[test]
    fn test_scale_down_only_mode() {
        let small = solid(16, 16, [255, 0, 0, 255]);
        let kept = scale_to_size(&small, 32, false);
        assert_eq!((kept.width(), kept.height()), (16, 16));

        let big = solid(64, 64, [255, 0, 0, 255]);
        let shrunk = scale_to_size(&big, 32, false);
        assert_eq!((shrunk.width(), shrunk.height()), (32, 32));
    }

    #[test]
    fn test_composite_applies_alpha_multiplier() {
        let mut canvas = solid(4, 4, [0, 0, 0, 0]);
        let src = solid(4, 4, [200, 100, 0, 255]);
        composite_over(&mut canvas, &src, 0, 0, 128);
        let px = canvas.get_pixel(1, 1);
        // Over transparent black the color survives at the scaled alpha.
        assert_eq!(px[3], 128);
        assert_eq!(px[0], 200);
    }

    #[test]
    fn test_composite_clips_out_of_bounds() {
        let mut canvas = solid(4, 4, [0, 0, 0, 0]);
        let src = solid(4, 4, [255, 255, 255, 255]);
        composite_over(&mut canvas, &src, -2, -2, 255);
        assert_eq!(canvas.get_pixel(0, 0)[3], 255);
        assert_eq!(canvas.get_pixel(2, 2)[3], 0);
    }

    #[test]
    fn test_render_reuses_canvas_buffer_for_same_dims() {
        let base = solid(32, 32, [10, 20, 30, 255]);
        let mut compositor = Compositor::new();
        let frame = Frame {
            base: &base,
            base_alpha: 255,
            emblem: None,
            emblem_alpha: 0,
            arrow: None,
            arrow_alpha: 0,
            edge: Edge::Bottom,
            idle: true,
            current_size: 32,
            max_size: 48,
        };
        let first = compositor.render(&frame).as_ptr();
        let second = compositor.render(&frame).as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_centers_base() {
        let base = solid(16, 16, [255, 0, 0, 255]);
        let mut compositor = Compositor::new();
        let frame = Frame {
            base: &base,
            base_alpha: 255,
            emblem: None,
            emblem_alpha: 0,
            arrow: None,
            arrow_alpha: 0,
            edge: Edge::Bottom,
            idle: true,
            current_size: 16,
            max_size: 48,
        };
        let canvas = compositor.render(&frame);
        // 16x16 centered on 48x48: filled in [16, 32), transparent
        // outside.
        assert_eq!(canvas.get_pixel(16, 16)[3], 255);
        assert_eq!(canvas.get_pixel(31, 31)[3], 255);
        assert_eq!(canvas.get_pixel(15, 15)[3], 0);
        assert_eq!(canvas.get_pixel(32, 32)[3], 0);
    }

    #[test]
    fn test_render_pins_emblem_to_origin() {
        let base = solid(16, 16, [0, 0, 255, 255]);
        let emblem = solid(8, 8, [0, 255, 0, 255]);
        let mut compositor = Compositor::new();
        let frame = Frame {
            base: &base,
            base_alpha: 255,
            emblem: Some(&emblem),
            emblem_alpha: 196,
            arrow: None,
            arrow_alpha: 0,
            edge: Edge::Bottom,
            idle: false,
            current_size: 16,
            max_size: 48,
        };
        let canvas = compositor.render(&frame);
        // Emblem visible forces the full square canvas.
        assert_eq!((canvas.width(), canvas.height()), (48, 48));
        let px = canvas.get_pixel(0, 0);
        assert!(px[1] > 0, "emblem should cover the origin");
    }

    #[test]
    fn test_arrow_pixbuf_orientation() {
        let down = arrow_pixbuf(Edge::Top);
        assert_eq!((down.width(), down.height()), (ARROW_SPAN, ARROW_DEPTH));
        // Down arrow: full row at the top, single tip at the bottom.
        assert_eq!(down.get_pixel(0, 0)[3], 255);
        assert_eq!(down.get_pixel(3, ARROW_DEPTH - 1)[3], 255);
        assert_eq!(down.get_pixel(0, ARROW_DEPTH - 1)[3], 0);

        let right = arrow_pixbuf(Edge::Left);
        assert_eq!((right.width(), right.height()), (ARROW_DEPTH, ARROW_SPAN));
        // Right arrow: full column on the left, tip on the right.
        assert_eq!(right.get_pixel(0, 0)[3], 255);
        assert_eq!(right.get_pixel(ARROW_DEPTH - 1, 3)[3], 255);
        assert_eq!(right.get_pixel(ARROW_DEPTH - 1, 0)[3], 0);
    }
}
