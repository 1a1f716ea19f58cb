//! Attribute store with observer fan-out
//!
//! The backbone of every configurable surface: named, typed attributes
//! whose changes notify registered observers exactly once per logical
//! change, in registration order, synchronously within `set`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::rc::Rc;

use super::Edge;

/// A typed attribute value.
///
/// Equality drives the no-op-write check: setting an attribute to an
/// equal value is a complete no-op.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Edge(Edge),
}

impl AttrValue {
    /// # Panics
    ///
    /// Panics if the value is not a `Bool`. Type mismatches are
    /// programming errors, like unknown keys.
    pub fn as_bool(&self) -> bool {
        match self {
            AttrValue::Bool(v) => *v,
            other => panic!("attribute type mismatch: expected Bool, got {other:?}"),
        }
    }

    pub fn as_int(&self) -> i64 {
        match self {
            AttrValue::Int(v) => *v,
            other => panic!("attribute type mismatch: expected Int, got {other:?}"),
        }
    }

    pub fn as_float(&self) -> f64 {
        match self {
            AttrValue::Float(v) => *v,
            other => panic!("attribute type mismatch: expected Float, got {other:?}"),
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            AttrValue::Text(v) => v,
            other => panic!("attribute type mismatch: expected Text, got {other:?}"),
        }
    }

    pub fn as_edge(&self) -> Edge {
        match self {
            AttrValue::Edge(v) => *v,
            other => panic!("attribute type mismatch: expected Edge, got {other:?}"),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

impl From<Edge> for AttrValue {
    fn from(v: Edge) -> Self {
        AttrValue::Edge(v)
    }
}

/// One attribute change, as seen by observers.
#[derive(Debug)]
pub struct AttributeChange<'a> {
    pub key: &'a str,
    pub old: &'a AttrValue,
    pub new: &'a AttrValue,
}

/// Implemented by objects interested in attribute changes.
///
/// Notifications run synchronously inside `AttributeStore::set`, so an
/// observer must not try to reach back into the store; the change
/// carries both values it needs.
pub trait Configurable {
    fn attribute_changed(&self, change: &AttributeChange<'_>);
}

/// Side-effect hook attached to a single attribute.
///
/// Runs once at declaration with `(None, &initial)` and on every real
/// change with `(Some(&old), &new)`, before observers are notified.
pub type AttributeHook = Box<dyn FnMut(Option<&AttrValue>, &AttrValue)>;

struct Attribute {
    value: AttrValue,
    hook: Option<AttributeHook>,
}

/// Holds named attribute values and the observers registered against
/// them.
///
/// Unknown keys are programming errors and panic (`get`, `set`);
/// unregistering a never-registered observer is a no-op.
#[derive(Default)]
pub struct AttributeStore {
    attributes: HashMap<String, Attribute>,
    observers: Vec<Rc<dyn Configurable>>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an attribute with an optional side-effect hook.
    ///
    /// The hook, if present, runs immediately with `(None, &initial)`.
    /// Redeclaring an existing key is a programming error; the first
    /// declaration wins.
    pub fn declare(
        &mut self,
        key: &str,
        initial: impl Into<AttrValue>,
        hook: Option<AttributeHook>,
    ) {
        debug_assert!(
            !self.attributes.contains_key(key),
            "attribute `{key}` declared twice"
        );
        if self.attributes.contains_key(key) {
            return;
        }
        let initial = initial.into();
        let mut hook = hook;
        if let Some(hook) = hook.as_mut() {
            hook(None, &initial);
        }
        self.attributes
            .insert(key.to_string(), Attribute { value: initial, hook });
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Declared attribute keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Set an attribute. Equal values are a complete no-op: no hook, no
    /// notification.
    ///
    /// # Panics
    ///
    /// Panics if the key was never declared.
    pub fn set(&mut self, key: &str, value: impl Into<AttrValue>) {
        let value = value.into();
        let Some(attr) = self.attributes.get_mut(key) else {
            panic!("unknown attribute: `{key}`");
        };
        if attr.value == value {
            return;
        }
        let old = std::mem::replace(&mut attr.value, value);
        let Attribute { value, hook } = attr;
        if let Some(hook) = hook.as_mut() {
            hook(Some(&old), value);
        }
        let new = value.clone();

        // Snapshot so an observer unregistering during the fan-out does
        // not skip its peers. Order is registration order.
        let observers: Vec<Rc<dyn Configurable>> = self.observers.clone();
        let change = AttributeChange {
            key,
            old: &old,
            new: &new,
        };
        for observer in observers {
            observer.attribute_changed(&change);
        }
    }

    /// # Panics
    ///
    /// Panics if the key was never declared.
    pub fn get(&self, key: &str) -> &AttrValue {
        match self.attributes.get(key) {
            Some(attr) => &attr.value,
            None => panic!("unknown attribute: `{key}`"),
        }
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).as_bool()
    }

    pub fn get_int(&self, key: &str) -> i64 {
        self.get(key).as_int()
    }

    pub fn get_float(&self, key: &str) -> f64 {
        self.get(key).as_float()
    }

    pub fn get_text(&self, key: &str) -> &str {
        self.get(key).as_text()
    }

    pub fn get_edge(&self, key: &str) -> Edge {
        self.get(key).as_edge()
    }

    /// Register an observer. Registering the same `Rc` twice is a
    /// no-op; it is notified once per change.
    pub fn register(&mut self, observer: Rc<dyn Configurable>) {
        if !self.observers.iter().any(|o| same_observer(o, &observer)) {
            self.observers.push(observer);
        }
    }

    /// Unregister an observer. Unknown observers are ignored.
    pub fn unregister(&mut self, observer: &Rc<dyn Configurable>) {
        self.observers.retain(|o| !same_observer(o, observer));
    }

    pub fn is_registered(&self, observer: &Rc<dyn Configurable>) -> bool {
        self.observers.iter().any(|o| same_observer(o, observer))
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

/// Observer identity is the `Rc` allocation, compared by data pointer.
fn same_observer(a: &Rc<dyn Configurable>, b: &Rc<dyn Configurable>) -> bool {
    std::ptr::eq(
        Rc::as_ptr(a) as *const (),
        Rc::as_ptr(b) as *const (),
    )
}
