//! Typed icon configuration over the attribute store

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use image::RgbaImage;

use super::{AttributeStore, Configurable, Edge};
use crate::icon::compositor::arrow_pixbuf;

/// Configuration shared by all icons of a tray: icon size, docked
/// edge, animation effects, and whether icons are hidden.
///
/// The `edge` attribute carries a declare-hook that rebuilds the
/// shared arrow pixbuf; observers registered on the store can rely on
/// the arrow being current when an `edge` notification arrives,
/// because hooks run before the observer fan-out.
pub struct IconConfig {
    store: AttributeStore,
    arrow: Rc<RefCell<Option<RgbaImage>>>,
}

impl IconConfig {
    pub fn new(size: u32, edge: Edge, effects: bool, hidden: bool) -> Self {
        assert!(size > 0, "icon size must be positive");

        let arrow = Rc::new(RefCell::new(None));
        let mut store = AttributeStore::new();

        let hook_arrow = arrow.clone();
        store.declare(
            "edge",
            edge,
            Some(Box::new(move |_old, new| {
                *hook_arrow.borrow_mut() = Some(arrow_pixbuf(new.as_edge()));
            })),
        );
        store.declare("size", size as i64, None);
        store.declare("effects", effects, None);
        store.declare("hidden", hidden, None);

        Self { store, arrow }
    }

    pub fn size(&self) -> u32 {
        self.store.get_int("size") as u32
    }

    pub fn set_size(&mut self, size: u32) {
        assert!(size > 0, "icon size must be positive");
        self.store.set("size", size as i64);
    }

    pub fn edge(&self) -> Edge {
        self.store.get_edge("edge")
    }

    pub fn set_edge(&mut self, edge: Edge) {
        self.store.set("edge", edge);
    }

    pub fn effects(&self) -> bool {
        self.store.get_bool("effects")
    }

    pub fn set_effects(&mut self, effects: bool) {
        self.store.set("effects", effects);
    }

    pub fn hidden(&self) -> bool {
        self.store.get_bool("hidden")
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.store.set("hidden", hidden);
    }

    /// True if the icons are on a vertical panel.
    pub fn vertical(&self) -> bool {
        self.edge().is_vertical()
    }

    /// The arrow pixbuf matching the current edge.
    pub fn arrow(&self) -> Option<RgbaImage> {
        self.arrow.borrow().clone()
    }

    /// Shared handle to the arrow cache, for observers that need the
    /// hook-derived arrow when an `edge` change is dispatched.
    pub fn arrow_cache(&self) -> Rc<RefCell<Option<RgbaImage>>> {
        self.arrow.clone()
    }

    pub fn register(&mut self, observer: Rc<dyn Configurable>) {
        self.store.register(observer);
    }

    pub fn unregister(&mut self, observer: &Rc<dyn Configurable>) {
        self.store.unregister(observer);
    }

    pub fn store(&self) -> &AttributeStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_built_at_declaration() {
        let config = IconConfig::new(32, Edge::Top, true, false);
        // The edge hook runs once with the initial value.
        assert!(config.arrow().is_some());
    }

    #[test]
    fn test_arrow_follows_edge() {
        let mut config = IconConfig::new(32, Edge::Top, true, false);
        let top_arrow = config.arrow().unwrap();
        config.set_edge(Edge::Left);
        let left_arrow = config.arrow().unwrap();
        // Top trays get a down arrow, left trays a right arrow; the
        // bitmaps differ.
        assert_ne!(top_arrow, left_arrow);
    }

    #[test]
    fn test_typed_accessors_roundtrip() {
        let mut config = IconConfig::new(24, Edge::Bottom, false, false);
        assert_eq!(config.size(), 24);
        assert!(!config.effects());
        assert!(!config.vertical());

        config.set_size(48);
        config.set_effects(true);
        config.set_edge(Edge::Right);
        assert_eq!(config.size(), 48);
        assert!(config.effects());
        assert!(config.vertical());
    }

    #[test]
    #[should_panic(expected = "positive")]
    fn test_zero_size_rejected() {
        let _ = IconConfig::new(0, Edge::Bottom, true, false);
    }
}
