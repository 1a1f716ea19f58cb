//! Typed tray configuration over the attribute store

#![allow(dead_code)]

use std::rc::Rc;

use super::{AttributeStore, Configurable};

/// Bitmask: show a main-menu box on the left end of the tray.
pub const MENUS_LEFT: i64 = 1;
/// Bitmask: show a main-menu box on the right end of the tray.
pub const MENUS_RIGHT: i64 = 2;

/// Tray-wide configuration: display name, where main-menu boxes go and
/// where separators are drawn (both `MENUS_LEFT`/`MENUS_RIGHT`
/// bitmasks, 0 for none).
pub struct TrayConfig {
    store: AttributeStore,
}

impl TrayConfig {
    pub fn new(name: &str, menus: i64, separators: i64) -> Self {
        let mut store = AttributeStore::new();
        store.declare("name", name, None);
        store.declare("menus", menus, None);
        store.declare("separators", separators, None);
        Self { store }
    }

    pub fn name(&self) -> &str {
        self.store.get_text("name")
    }

    pub fn set_name(&mut self, name: &str) {
        self.store.set("name", name);
    }

    pub fn menus(&self) -> i64 {
        self.store.get_int("menus")
    }

    pub fn set_menus(&mut self, menus: i64) {
        self.store.set("menus", menus);
    }

    pub fn separators(&self) -> i64 {
        self.store.get_int("separators")
    }

    pub fn set_separators(&mut self, separators: i64) {
        self.store.set("separators", separators);
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
    fn test_roundtrip() {
        let mut config = TrayConfig::new("tasks", MENUS_LEFT, 0);
        assert_eq!(config.name(), "tasks");
        assert_eq!(config.menus(), MENUS_LEFT);

        config.set_menus(MENUS_LEFT | MENUS_RIGHT);
        config.set_separators(MENUS_RIGHT);
        assert_eq!(config.menus(), MENUS_LEFT | MENUS_RIGHT);
        assert_eq!(config.separators(), MENUS_RIGHT);
    }
}
