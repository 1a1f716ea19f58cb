//! Items
//!
//! An `Item` is the logical entity an icon renders: a window, a
//! launcher, a group. The tray core only reads items through this
//! capability set and reacts to generic "changed" property sets; what
//! an item actually is stays with the embedding application.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use image::RgbaImage;

use crate::icon::compositor::scale_to_size;
use crate::sources::ImageSource;

/// Base zoom factor of a minimized item.
pub const MINIMIZED_ZOOM: f64 = 0.66;

/// Item properties the tray reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemProperty {
    Name,
    Icon,
    Zoom,
    HasArrow,
    Visibility,
    Blinking,
    GreyedOut,
    Emblem,
}

/// Read-only capability set an icon renders from.
pub trait Item {
    /// The display name, used for the tooltip.
    fn name(&self) -> String {
        String::new()
    }

    /// Icon sources to try, in order.
    fn sources(&self) -> Vec<Rc<dyn ImageSource>> {
        Vec::new()
    }

    /// The emblem badge shown in the canvas corner.
    fn emblem(&self) -> Option<RgbaImage> {
        None
    }

    fn is_visible(&self) -> bool {
        true
    }

    fn is_greyed_out(&self) -> bool {
        false
    }

    fn is_blinking(&self) -> bool {
        false
    }

    fn is_minimized(&self) -> bool {
        false
    }

    fn is_active(&self) -> bool {
        false
    }

    fn has_arrow(&self) -> bool {
        false
    }

    /// The base zoom hint: minimized items render smaller.
    fn zoom(&self) -> f64 {
        if self.is_minimized() {
            MINIMIZED_ZOOM
        } else {
            1.0
        }
    }

    /// Resolve the item's image at the given size: the first source
    /// that yields a pixbuf wins, scaled to fit.
    fn get_icon(&self, size: u32) -> Option<RgbaImage> {
        for source in self.sources() {
            if let Some(pixbuf) = source.get_pixbuf(size) {
                return Some(scale_to_size(&pixbuf, size, true));
            }
        }
        None
    }
}

#[derive(Default)]
struct StaticItemState {
    name: String,
    sources: Vec<Rc<dyn ImageSource>>,
    emblem: Option<RgbaImage>,
    visible: bool,
    greyed_out: bool,
    blinking: bool,
    minimized: bool,
    active: bool,
    arrow: bool,
}

/// A concrete item with directly settable state.
///
/// Mutate it, then route the matching `ItemProperty` set through
/// `Tray::item_changed`, the same flow a live window item follows
/// when its source emits a change.
pub struct StaticItem {
    state: RefCell<StaticItemState>,
}

impl StaticItem {
    pub fn new(name: &str) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(StaticItemState {
                name: name.to_string(),
                visible: true,
                ..Default::default()
            }),
        })
    }

    pub fn set_name(&self, name: &str) {
        self.state.borrow_mut().name = name.to_string();
    }

    pub fn add_source(&self, source: Rc<dyn ImageSource>) {
        self.state.borrow_mut().sources.push(source);
    }

    pub fn set_emblem(&self, emblem: Option<RgbaImage>) {
        self.state.borrow_mut().emblem = emblem;
    }

    pub fn set_visible(&self, visible: bool) {
        self.state.borrow_mut().visible = visible;
    }

    pub fn set_greyed_out(&self, greyed_out: bool) {
        self.state.borrow_mut().greyed_out = greyed_out;
    }

    pub fn set_blinking(&self, blinking: bool) {
        self.state.borrow_mut().blinking = blinking;
    }

    pub fn set_minimized(&self, minimized: bool) {
        self.state.borrow_mut().minimized = minimized;
    }

    pub fn set_active(&self, active: bool) {
        self.state.borrow_mut().active = active;
    }

    pub fn set_has_arrow(&self, arrow: bool) {
        self.state.borrow_mut().arrow = arrow;
    }
}

impl Item for StaticItem {
    fn name(&self) -> String {
        self.state.borrow().name.clone()
    }

    fn sources(&self) -> Vec<Rc<dyn ImageSource>> {
        self.state.borrow().sources.clone()
    }

    fn emblem(&self) -> Option<RgbaImage> {
        self.state.borrow().emblem.clone()
    }

    fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    fn is_greyed_out(&self) -> bool {
        self.state.borrow().greyed_out
    }

    fn is_blinking(&self) -> bool {
        self.state.borrow().blinking
    }

    fn is_minimized(&self) -> bool {
        self.state.borrow().minimized
    }

    fn is_active(&self) -> bool {
        self.state.borrow().active
    }

    fn has_arrow(&self) -> bool {
        self.state.borrow().arrow
    }
}
