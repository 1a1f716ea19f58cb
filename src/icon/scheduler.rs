//! Tick scheduling
//!
//! A single-threaded timer queue driving icon animation. Icons hold at
//! most one pending handle per timer kind, so refresh requests arriving
//! while a tick is in flight coalesce instead of stacking timers. The
//! queue never sleeps itself; the host event loop asks for the next
//! deadline and fires entries when they come due.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use super::IconId;

/// Delay between two animation ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(6);
/// Delay between two blink states.
pub const BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Opaque handle identifying one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// What a timer drives when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// Advance the icon's animation one step.
    Tick(IconId),
    /// Toggle the icon's blink state.
    Blink(IconId),
}

impl TimerKey {
    pub fn icon(&self) -> IconId {
        match self {
            TimerKey::Tick(id) | TimerKey::Blink(id) => *id,
        }
    }
}

struct TimerEntry {
    handle: TimerHandle,
    due: Instant,
    key: TimerKey,
}

/// Pending timers, earliest-due first on firing.
#[derive(Default)]
pub struct TimerQueue {
    next_handle: u64,
    entries: Vec<TimerEntry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay: Duration, key: TimerKey) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        self.entries.push(TimerEntry {
            handle,
            due: Instant::now() + delay,
            key,
        });
        handle
    }

    /// Cancel a pending timer. Unknown handles are ignored.
    pub fn cancel(&mut self, handle: TimerHandle) {
        self.entries.retain(|e| e.handle != handle);
    }

    /// Cancel every pending timer belonging to an icon.
    pub fn cancel_icon(&mut self, icon: IconId) {
        self.entries.retain(|e| e.key.icon() != icon);
    }

    /// Deadline of the earliest pending timer.
    pub fn next_due(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Remove and return the earliest pending timer, regardless of
    /// whether its deadline has passed. The driver sleeps until
    /// `next_due` before calling this; tests fire eagerly.
    pub fn fire_next(&mut self) -> Option<(TimerHandle, TimerKey)> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .min_by_key(|(_, e)| e.due)
            .map(|(i, _)| i)?;
        let entry = self.entries.remove(index);
        Some((entry.handle, entry.key))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
