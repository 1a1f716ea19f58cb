//! Animated tray icon
//!
//! An `Icon` renders one item: it owns the animation state, the
//! compositing canvas, and the zoom inputs, and publishes frames into
//! an opaque host surface. Variant behavior (what to draw, which
//! flags apply) comes from the item layer; the icon itself is only the
//! rendering machine.

#![allow(dead_code)]

pub mod animation;
pub mod compositor;
pub mod scheduler;
pub mod zoom;

use std::cell::RefCell;
use std::rc::Rc;

use image::RgbaImage;
use tracing::debug;

use crate::config::Edge;

use animation::{AnimationState, Collapse, Phase, EMBLEM_ALPHA};
use compositor::{scale_to_size, Compositor, Frame, MAX_SOURCE_SIZE};
use scheduler::{TimerHandle, TimerKey, TimerQueue, BLINK_INTERVAL, TICK_INTERVAL};
use zoom::{compute_zoom, ZoomInput, MAX_ZOOM};

/// Identifies one icon within a tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconId(u64);

impl IconId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for IconId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "icon#{}", self.0)
    }
}

/// Host surface an icon publishes into.
///
/// The engine never learns how the image is displayed; `hide` and
/// `destroy` are the terminal toolkit actions fired once the collapse
/// animation has fully converged.
pub trait IconSurface {
    fn set_image(&mut self, image: &RgbaImage);
    fn set_tooltip(&mut self, _tooltip: &str) {}
    fn show(&mut self);
    fn hide(&mut self);
    fn destroy(&mut self);
}

/// Default icon size before configuration applies.
const DEFAULT_SIZE: u32 = 32;

/// One animated, composited tray icon.
pub struct Icon {
    id: IconId,
    timers: Rc<RefCell<TimerQueue>>,
    surface: Box<dyn IconSurface>,

    pixbuf: Option<RgbaImage>,
    pixbuf_current: Option<RgbaImage>,
    compositor: Compositor,

    state: AnimationState,
    visible: bool,
    destroyed: bool,

    size: u32,
    max_size: u32,
    edge: Edge,
    effects: bool,

    arrow: Option<RgbaImage>,
    has_arrow: bool,

    emblem_orig: Option<RgbaImage>,
    emblem_scaled: Option<RgbaImage>,

    zoom_factor: f64,
    zoom_factor_base: f64,
    zoom_factor_orig: f64,
    mouse_over: bool,
    pointer: (f64, f64),
    menu_open: bool,

    tick_timer: Option<TimerHandle>,
    blink_timer: Option<TimerHandle>,

    tooltip: String,
}

impl Icon {
    pub fn new(id: IconId, timers: Rc<RefCell<TimerQueue>>, surface: Box<dyn IconSurface>) -> Self {
        Self {
            id,
            timers,
            surface,
            pixbuf: None,
            pixbuf_current: None,
            compositor: Compositor::new(),
            state: AnimationState::new(DEFAULT_SIZE),
            visible: false,
            destroyed: false,
            size: DEFAULT_SIZE,
            max_size: DEFAULT_SIZE * 3 / 2,
            edge: Edge::None,
            effects: false,
            arrow: None,
            has_arrow: false,
            emblem_orig: None,
            emblem_scaled: None,
            zoom_factor: 1.0,
            zoom_factor_base: 1.0,
            zoom_factor_orig: 1.0,
            mouse_over: false,
            pointer: (0.0, 0.0),
            menu_open: false,
            tick_timer: None,
            blink_timer: None,
            tooltip: String::new(),
        }
    }

    pub fn id(&self) -> IconId {
        self.id
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn tick_pending(&self) -> bool {
        self.tick_timer.is_some()
    }

    /// Set the base image. Oversized sources are scaled down once up
    /// front; a changed image invalidates the per-frame scaling cache
    /// and forces a recomposite.
    pub fn set_pixbuf(&mut self, pixbuf: Option<RgbaImage>) {
        let pixbuf = pixbuf.map(|p| {
            if p.width() >= MAX_SOURCE_SIZE || p.height() >= MAX_SOURCE_SIZE {
                scale_to_size(&p, MAX_SOURCE_SIZE, false)
            } else {
                p
            }
        });
        let changed = self.pixbuf != pixbuf;
        if changed {
            self.pixbuf_current = None;
        }
        self.pixbuf = pixbuf;
        self.refresh(changed);
    }

    /// Set the emblem badge. The emblem is pre-scaled to a third of
    /// the maximum size and fades in toward its fixed alpha.
    pub fn set_emblem(&mut self, emblem: Option<RgbaImage>) {
        let changed = self.emblem_orig != emblem;
        self.emblem_orig = emblem;
        self.emblem_scaled = self
            .emblem_orig
            .as_ref()
            .map(|e| scale_to_size(e, self.max_size / 3, false));
        self.update_emblem_target_alpha();
        self.refresh(changed);
        debug_assert_eq!(self.emblem_orig.is_some(), self.emblem_scaled.is_some());
    }

    pub fn set_has_arrow(&mut self, has_arrow: bool) {
        self.has_arrow = has_arrow;
        self.update_arrow_target_alpha();
        self.refresh(false);
    }

    /// Target alpha of the base image (greyed-out items use 128).
    pub fn set_alpha(&mut self, alpha: u8) {
        if self.state.target_alpha == alpha {
            return;
        }
        self.state.target_alpha = alpha;
        self.refresh(false);
    }

    pub fn set_tooltip(&mut self, tooltip: &str) {
        self.tooltip = tooltip.to_string();
        self.surface.set_tooltip(tooltip);
    }

    /// Set the base zoom factor, clamped to `[0, 1.5]`.
    pub fn set_zoom_factor(&mut self, zoom_factor: f64) {
        let zoom_factor = zoom_factor.clamp(0.0, MAX_ZOOM);
        let old = self.zoom_factor_base;
        self.zoom_factor_base = zoom_factor;
        self.zoom_factor_orig = zoom_factor;
        if old != self.zoom_factor_base {
            self.update_zoom_factor();
        }
    }

    /// Dock the icon against an edge. The arrow pixbuf normally comes
    /// from the icon config's edge hook; standalone icons fall back to
    /// building their own.
    pub fn set_edge(&mut self, edge: Edge, arrow: Option<RgbaImage>) {
        self.edge = edge;
        self.arrow = Some(arrow.unwrap_or_else(|| compositor::arrow_pixbuf(edge)));
        self.refresh(true);
    }

    pub fn set_effects(&mut self, effects: bool) {
        self.effects = effects;
        self.refresh(true);
    }

    /// Change the configured icon size. Re-runs the source cap and the
    /// emblem scaling against the new maximum.
    pub fn set_size(&mut self, size: u32) {
        self.size = size.max(1);
        self.max_size = self.size * 3 / 2;
        let pixbuf = self.pixbuf.take();
        self.pixbuf_current = None;
        self.set_pixbuf(pixbuf);
        let emblem = self.emblem_orig.take();
        self.set_emblem(emblem);
    }

    /// Start or stop blinking. Blinking swings the base zoom factor
    /// between half and one-and-a-half of its original value every
    /// blink interval.
    pub fn set_blinking(&mut self, blinking: bool) {
        if blinking {
            if self.blink_timer.is_none() {
                self.zoom_factor_orig = self.zoom_factor_base;
                self.blink_timer = Some(
                    self.timers
                        .borrow_mut()
                        .schedule(BLINK_INTERVAL, TimerKey::Blink(self.id)),
                );
            }
        } else if let Some(handle) = self.blink_timer.take() {
            self.timers.borrow_mut().cancel(handle);
            self.zoom_factor_base = self.zoom_factor_orig;
            self.update_zoom_factor();
        }
    }

    /// Advance the blink state. Called by the tray when a blink timer
    /// fires.
    pub fn on_blink(&mut self) {
        if self.blink_timer.is_none() || self.destroyed {
            return;
        }
        if self.zoom_factor_base == self.zoom_factor_orig * 0.5 {
            self.zoom_factor_base = self.zoom_factor_orig * 1.5;
        } else {
            self.zoom_factor_base = self.zoom_factor_orig * 0.5;
        }
        self.update_zoom_factor();
        self.refresh(true);
        self.blink_timer = Some(
            self.timers
                .borrow_mut()
                .schedule(BLINK_INTERVAL, TimerKey::Blink(self.id)),
        );
    }

    /// The pointer moved over the icon, in icon-local coordinates.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer = (x, y);
        self.mouse_over = true;
        self.update_zoom_factor();
    }

    pub fn pointer_left(&mut self) {
        self.mouse_over = false;
        self.update_zoom_factor();
    }

    pub fn set_menu_open(&mut self, open: bool) {
        if self.menu_open != open {
            self.menu_open = open;
            self.update_zoom_factor();
        }
    }

    fn update_zoom_factor(&mut self) {
        self.zoom_factor = compute_zoom(&ZoomInput {
            pointer_x: self.pointer.0,
            pointer_y: self.pointer.1,
            half_size: self.max_size as f64 / 2.0,
            edge: self.edge,
            effects: self.effects,
            mouse_over: self.mouse_over,
            menu_open: self.menu_open,
            base_factor: self.zoom_factor_base,
        });
        self.refresh(false);
    }

    fn update_arrow_target_alpha(&mut self) {
        if self.state.phase.is_terminal() {
            return;
        }
        self.state.arrow_target_alpha = if self.has_arrow { 255 } else { 0 };
    }

    fn update_emblem_target_alpha(&mut self) {
        if self.state.phase.is_terminal() {
            return;
        }
        self.state.emblem_target_alpha = if self.emblem_orig.is_some() {
            EMBLEM_ALPHA
        } else {
            0
        };
    }

    /// Grow the icon in. If it was not previously visible it starts
    /// from size 1 with the overlays faded out.
    pub fn show(&mut self) {
        if self.destroyed {
            return;
        }
        self.state.phase = Phase::Showing;
        self.update_arrow_target_alpha();
        self.update_emblem_target_alpha();
        if !self.visible {
            self.state.reset_for_show();
            self.visible = true;
            self.surface.show();
        }
        self.refresh(false);
    }

    /// Collapse the icon, then fire the terminal hide action.
    pub fn hide(&mut self) {
        if !self.visible {
            return;
        }
        self.state.phase = Phase::Hiding;
        self.refresh(false);
    }

    /// Collapse the icon, then fire the terminal destroy action. An
    /// invisible icon is destroyed immediately.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        if !self.visible {
            self.finish_destroy();
            return;
        }
        self.state.phase = Phase::Destroying;
        self.refresh(false);
    }

    fn finish_destroy(&mut self) {
        debug!(icon = %self.id, "destroying icon");
        self.destroyed = true;
        self.visible = false;
        self.timers.borrow_mut().cancel_icon(self.id);
        self.tick_timer = None;
        self.blink_timer = None;
        self.surface.destroy();
    }

    /// Refresh the icon, recomputing the live size target and driving
    /// the animation. With `force` false, nothing happens while the
    /// state is already converged.
    ///
    /// A refresh while a tick is pending is coalesced; the in-flight
    /// tick picks up the new targets.
    pub fn refresh(&mut self, force: bool) {
        if self.destroyed || self.pixbuf.is_none() || !self.visible {
            return;
        }

        if !self.state.phase.is_terminal() {
            let live_max = self.max_size.saturating_sub(2).max(1);
            self.state.target_size =
                ((self.size as f64 * self.zoom_factor) as u32).clamp(1, live_max);
            if !force && self.state.converged() {
                return;
            }
        }

        if self.tick_timer.is_some() {
            return;
        }

        if self.effects {
            if self.step() {
                self.tick_timer = Some(
                    self.timers
                        .borrow_mut()
                        .schedule(TICK_INTERVAL, TimerKey::Tick(self.id)),
                );
            }
        } else {
            self.state.snap_to_targets();
            self.pixbuf_current = None;
            while self.step() {}
        }
    }

    /// Advance the animation one step. Called by the tray when a tick
    /// timer fires.
    pub fn on_tick(&mut self) {
        self.tick_timer = None;
        if self.destroyed {
            return;
        }
        if self.step() {
            self.tick_timer = Some(
                self.timers
                    .borrow_mut()
                    .schedule(TICK_INTERVAL, TimerKey::Tick(self.id)),
            );
        }
    }

    /// Composite and publish one frame, then either advance the state
    /// one tick or resolve the finished animation. Returns true while
    /// more ticks are needed.
    fn step(&mut self) -> bool {
        let Some(pixbuf) = self.pixbuf.as_ref() else {
            return false;
        };

        if self.pixbuf_current.is_none() || self.state.current_size != self.state.target_size {
            self.pixbuf_current = Some(scale_to_size(pixbuf, self.state.current_size, true));
        }
        let base = self
            .pixbuf_current
            .as_ref()
            .expect("scaled pixbuf computed above");

        let frame = Frame {
            base,
            base_alpha: self.state.current_alpha,
            emblem: self.emblem_scaled.as_ref(),
            emblem_alpha: self.state.emblem_current_alpha,
            arrow: self.arrow.as_ref(),
            arrow_alpha: self.state.arrow_current_alpha,
            edge: self.edge,
            idle: self.state.phase == Phase::None,
            current_size: self.state.current_size,
            max_size: self.max_size,
        };
        let canvas = self.compositor.render(&frame);
        self.surface.set_image(canvas);

        if self.state.converged() {
            match self.state.phase {
                Phase::Hiding => match self.state.stage_collapse() {
                    Collapse::FadeOverlays | Collapse::Shrink => return true,
                    Collapse::Finished => {
                        self.visible = false;
                        self.surface.hide();
                    }
                },
                Phase::Destroying => match self.state.stage_collapse() {
                    Collapse::FadeOverlays | Collapse::Shrink => return true,
                    Collapse::Finished => {
                        self.finish_destroy();
                        return false;
                    }
                },
                Phase::None | Phase::Showing => {}
            }
            self.state.phase = Phase::None;
            return false;
        }

        self.state.tick();
        true
    }
}
