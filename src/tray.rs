//! Tray container
//!
//! Owns the configuration stores, the timer queue, and an explicit
//! registry mapping icon ids to their item and icon. Configuration
//! changes reach icons through per-icon observers registered on the
//! icon config; item changes are routed in through
//! [`Tray::item_changed`] with the property set that changed.
//!
//! Managers run as step-wise state machines: while a manage or
//! unmanage run is in flight the tray is busy and further runs queue
//! up behind it.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::{Rc, Weak};
use std::time::Instant;

use image::RgbaImage;
use tracing::debug;

use crate::config::{AttributeChange, Configurable, IconConfig, TrayConfig};
use crate::icon::animation::GREYED_OUT_ALPHA;
use crate::icon::scheduler::{TimerKey, TimerQueue};
use crate::icon::{Icon, IconId, IconSurface};
use crate::item::{Item, ItemProperty};

/// Builds the host surface for a newly added icon.
pub type SurfaceFactory = Box<dyn Fn(IconId) -> Box<dyn IconSurface>>;

/// Result of one manager step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// More steps remain; the tray stays busy.
    Yield,
    /// This manager is finished with the current run.
    Done,
}

/// Step-wise setup/teardown attached to a tray.
///
/// Steps run one at a time from [`Tray::pump`]; a manager that needs
/// to add or remove items captures the handles it needs at
/// construction.
pub trait TrayManager {
    fn manage_step(&mut self) -> StepResult;
    fn unmanage_step(&mut self) -> StepResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Manage,
    Unmanage,
}

struct ActiveRun {
    kind: RunKind,
    index: usize,
}

/// Per-icon observer wired into the icon config.
///
/// Holds weak references; a destroyed icon silently drops out. The
/// arrow cache is shared with the config's edge hook, which runs
/// before this observer, so the arrow is always current for the edge
/// being dispatched.
struct IconBinding {
    item: Weak<dyn Item>,
    icon: Weak<RefCell<Icon>>,
    arrow: Rc<RefCell<Option<RgbaImage>>>,
}

impl Configurable for IconBinding {
    fn attribute_changed(&self, change: &AttributeChange<'_>) {
        let Some(icon) = self.icon.upgrade() else {
            return;
        };
        match change.key {
            "size" => {
                let size = change.new.as_int() as u32;
                if let Some(item) = self.item.upgrade() {
                    if let Some(pixbuf) = item.get_icon(size) {
                        let mut icon = icon.borrow_mut();
                        icon.set_pixbuf(Some(pixbuf));
                        icon.set_alpha(item_alpha(item.as_ref()));
                    }
                }
                icon.borrow_mut().set_size(size);
            }
            "edge" => {
                let arrow = self.arrow.borrow().clone();
                icon.borrow_mut().set_edge(change.new.as_edge(), arrow);
            }
            "effects" => icon.borrow_mut().set_effects(change.new.as_bool()),
            "hidden" => {
                let hidden = change.new.as_bool();
                let item_visible = self
                    .item
                    .upgrade()
                    .map(|item| item.is_visible())
                    .unwrap_or(false);
                if !hidden && item_visible {
                    icon.borrow_mut().show();
                } else {
                    icon.borrow_mut().hide();
                }
            }
            _ => {}
        }
    }
}

fn item_alpha(item: &dyn Item) -> u8 {
    if item.is_greyed_out() {
        GREYED_OUT_ALPHA
    } else {
        0xff
    }
}

struct TrayEntry {
    item: Rc<dyn Item>,
    icon: Rc<RefCell<Icon>>,
    binding: Rc<dyn Configurable>,
}

/// The tray: configuration, icon registry, timers, and managers.
pub struct Tray {
    icon_config: IconConfig,
    tray_config: TrayConfig,
    timers: Rc<RefCell<TimerQueue>>,
    entries: HashMap<IconId, TrayEntry>,
    order: Vec<IconId>,
    next_id: u64,
    surface_factory: SurfaceFactory,
    managers: Vec<Box<dyn TrayManager>>,
    busy: bool,
    pending_runs: VecDeque<RunKind>,
    active: Option<ActiveRun>,
}

impl Tray {
    pub fn new(
        icon_config: IconConfig,
        tray_config: TrayConfig,
        surface_factory: SurfaceFactory,
    ) -> Self {
        Self {
            icon_config,
            tray_config,
            timers: Rc::new(RefCell::new(TimerQueue::new())),
            entries: HashMap::new(),
            order: Vec::new(),
            next_id: 0,
            surface_factory,
            managers: Vec::new(),
            busy: false,
            pending_runs: VecDeque::new(),
            active: None,
        }
    }

    pub fn icon_config(&self) -> &IconConfig {
        &self.icon_config
    }

    pub fn icon_config_mut(&mut self) -> &mut IconConfig {
        &mut self.icon_config
    }

    pub fn tray_config(&self) -> &TrayConfig {
        &self.tray_config
    }

    pub fn tray_config_mut(&mut self) -> &mut TrayConfig {
        &mut self.tray_config
    }

    /// Add an item: builds an icon, syncs the full initial state, and
    /// shows it if the item and the tray agree it should be visible.
    pub fn add_item(&mut self, item: Rc<dyn Item>) -> IconId {
        self.next_id += 1;
        let id = IconId::new(self.next_id);
        let surface = (self.surface_factory)(id);
        let mut icon = Icon::new(id, self.timers.clone(), surface);

        icon.set_edge(self.icon_config.edge(), self.icon_config.arrow());
        icon.set_effects(self.icon_config.effects());
        icon.set_size(self.icon_config.size());
        icon.set_tooltip(&item.name());
        if let Some(pixbuf) = item.get_icon(self.icon_config.size()) {
            icon.set_pixbuf(Some(pixbuf));
            icon.set_alpha(item_alpha(item.as_ref()));
        }
        icon.set_zoom_factor(item.zoom());
        icon.set_has_arrow(item.has_arrow());
        icon.set_emblem(item.emblem());

        let icon = Rc::new(RefCell::new(icon));
        let binding: Rc<dyn Configurable> = Rc::new(IconBinding {
            item: Rc::downgrade(&item),
            icon: Rc::downgrade(&icon),
            arrow: self.icon_config.arrow_cache(),
        });
        self.icon_config.register(binding.clone());

        if item.is_visible() && !self.icon_config.hidden() {
            icon.borrow_mut().show();
        }
        if item.is_blinking() {
            icon.borrow_mut().set_blinking(true);
        }

        debug!(icon = %id, name = %item.name(), "item added");
        self.entries.insert(id, TrayEntry { item, icon, binding });
        self.order.push(id);
        id
    }

    /// Remove an item. Its icon zooms out, then the terminal destroy
    /// action fires and the entry is reaped.
    pub fn remove_item(&mut self, id: IconId) {
        let Some(entry) = self.entries.get(&id) else {
            return;
        };
        entry.icon.borrow_mut().destroy();
        self.reap();
    }

    /// Route an item change through the matching icon updates.
    pub fn item_changed(&mut self, id: IconId, props: &[ItemProperty]) {
        let Some(entry) = self.entries.get(&id) else {
            return;
        };
        let item = entry.item.clone();
        let icon = entry.icon.clone();

        for prop in props {
            match prop {
                ItemProperty::Name => icon.borrow_mut().set_tooltip(&item.name()),
                ItemProperty::Icon | ItemProperty::GreyedOut => {
                    if let Some(pixbuf) = item.get_icon(self.icon_config.size()) {
                        let mut icon = icon.borrow_mut();
                        icon.set_pixbuf(Some(pixbuf));
                        icon.set_alpha(item_alpha(item.as_ref()));
                    }
                }
                ItemProperty::Zoom => icon.borrow_mut().set_zoom_factor(item.zoom()),
                ItemProperty::HasArrow => icon.borrow_mut().set_has_arrow(item.has_arrow()),
                ItemProperty::Visibility => {
                    if item.is_visible() && !self.icon_config.hidden() {
                        icon.borrow_mut().show();
                    } else {
                        icon.borrow_mut().hide();
                    }
                }
                ItemProperty::Blinking => icon.borrow_mut().set_blinking(item.is_blinking()),
                ItemProperty::Emblem => icon.borrow_mut().set_emblem(item.emblem()),
            }
        }
    }

    pub fn icon(&self, id: IconId) -> Option<Rc<RefCell<Icon>>> {
        self.entries.get(&id).map(|e| e.icon.clone())
    }

    pub fn item(&self, id: IconId) -> Option<Rc<dyn Item>> {
        self.entries.get(&id).map(|e| e.item.clone())
    }

    /// Icon ids in registration order.
    pub fn ids(&self) -> Vec<IconId> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deadline of the earliest pending animation timer.
    pub fn next_timer_due(&self) -> Option<Instant> {
        self.timers.borrow().next_due()
    }

    /// Fire the earliest pending timer, dispatching to its icon.
    /// Returns false when no timer was pending.
    pub fn fire_next_timer(&mut self) -> bool {
        let fired = self.timers.borrow_mut().fire_next();
        let Some((_, key)) = fired else {
            return false;
        };
        let icon = self.entries.get(&key.icon()).map(|e| e.icon.clone());
        if let Some(icon) = icon {
            match key {
                TimerKey::Tick(_) => icon.borrow_mut().on_tick(),
                TimerKey::Blink(_) => icon.borrow_mut().on_blink(),
            }
            if icon.borrow().is_destroyed() {
                self.reap();
            }
        }
        true
    }

    /// Drop destroyed icons: unregister their config binding and
    /// cancel whatever timers they had left.
    fn reap(&mut self) {
        let dead: Vec<IconId> = self
            .entries
            .iter()
            .filter(|(_, e)| e.icon.borrow().is_destroyed())
            .map(|(id, _)| *id)
            .collect();
        for id in dead {
            if let Some(entry) = self.entries.remove(&id) {
                self.icon_config.unregister(&entry.binding);
                self.timers.borrow_mut().cancel_icon(id);
                self.order.retain(|other| *other != id);
                debug!(icon = %id, "icon reaped");
            }
        }
    }

    // --- managers ---

    pub fn add_manager(&mut self, manager: Box<dyn TrayManager>) {
        self.managers.push(manager);
    }

    /// Queue a manage run. Runs one at a time: while a previous
    /// manage/unmanage run is in flight the new run waits.
    pub fn manage(&mut self) {
        self.pending_runs.push_back(RunKind::Manage);
        self.try_start_run();
    }

    /// Queue an unmanage run.
    pub fn unmanage(&mut self) {
        self.pending_runs.push_back(RunKind::Unmanage);
        self.try_start_run();
    }

    /// Queue an unmanage followed by a manage.
    pub fn refresh_managers(&mut self) {
        self.pending_runs.push_back(RunKind::Unmanage);
        self.pending_runs.push_back(RunKind::Manage);
        self.try_start_run();
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    fn try_start_run(&mut self) {
        if self.busy {
            return;
        }
        if let Some(kind) = self.pending_runs.pop_front() {
            self.busy = true;
            self.active = Some(ActiveRun { kind, index: 0 });
        }
    }

    /// Advance the active manager run one step. Returns true while
    /// work remains (active or queued).
    pub fn pump(&mut self) -> bool {
        if self.active.is_none() {
            self.try_start_run();
        }
        let Some(run) = self.active.as_mut() else {
            return false;
        };

        if run.index < self.managers.len() {
            let result = match run.kind {
                RunKind::Manage => self.managers[run.index].manage_step(),
                RunKind::Unmanage => self.managers[run.index].unmanage_step(),
            };
            if result == StepResult::Done {
                run.index += 1;
            }
        }

        if self.active.as_ref().is_some_and(|r| r.index >= self.managers.len()) {
            self.active = None;
            self.busy = false;
            self.try_start_run();
        }

        self.active.is_some() || !self.pending_runs.is_empty()
    }
}
