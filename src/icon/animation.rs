//! Per-icon animation state
//!
//! Tracks current/target size and the three alpha channels, advances
//! them one discrete step at a time, and stages the collapse sequence
//! for hiding and destroying icons.

#![allow(dead_code)]

/// Pixels a size moves per tick.
pub const SIZE_STEP: u32 = 1;
/// Alpha units a channel moves per tick.
pub const ALPHA_STEP: u8 = 5;
/// Target alpha of a visible emblem badge.
pub const EMBLEM_ALPHA: u8 = 196;
/// Base alpha of a greyed-out icon.
pub const GREYED_OUT_ALPHA: u8 = 128;

/// Lifecycle phase of an icon's animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Idle; values equal their targets.
    #[default]
    None,
    /// Growing in after a display request.
    Showing,
    /// Collapsing toward the terminal hide action.
    Hiding,
    /// Collapsing toward the terminal destroy action.
    Destroying,
}

impl Phase {
    /// True while the icon is on its way out.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Hiding | Phase::Destroying)
    }
}

/// Next stage of a hide/destroy collapse, derived once all tracked
/// values have converged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collapse {
    /// Overlays still visible; their targets were just forced to 0.
    FadeOverlays,
    /// Overlays gone; the size target was just forced to 1.
    Shrink,
    /// Fully collapsed; the terminal action may fire.
    Finished,
}

/// Mutable animation state owned by exactly one icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationState {
    pub current_size: u32,
    pub target_size: u32,
    pub current_alpha: u8,
    pub target_alpha: u8,
    pub arrow_current_alpha: u8,
    pub arrow_target_alpha: u8,
    pub emblem_current_alpha: u8,
    pub emblem_target_alpha: u8,
    pub phase: Phase,
}

impl AnimationState {
    /// Fresh state for an icon that will grow toward `size` when first
    /// shown.
    pub fn new(size: u32) -> Self {
        Self {
            current_size: 1,
            target_size: size.max(1),
            current_alpha: 0xff,
            target_alpha: 0xff,
            arrow_current_alpha: 0,
            arrow_target_alpha: 0,
            emblem_current_alpha: 0,
            emblem_target_alpha: 0,
            phase: Phase::None,
        }
    }

    /// All four tracked values equal their targets simultaneously.
    pub fn converged(&self) -> bool {
        self.current_size == self.target_size
            && self.current_alpha == self.target_alpha
            && self.arrow_current_alpha == self.arrow_target_alpha
            && self.emblem_current_alpha == self.emblem_target_alpha
    }

    /// Advance every channel one step toward its target, clamped at the
    /// target. Size moves by 1, alphas by 5.
    pub fn tick(&mut self) {
        self.current_size = step_size(self.current_size, self.target_size);
        self.current_alpha = step_alpha(self.current_alpha, self.target_alpha);
        self.arrow_current_alpha =
            step_alpha(self.arrow_current_alpha, self.arrow_target_alpha);
        self.emblem_current_alpha =
            step_alpha(self.emblem_current_alpha, self.emblem_target_alpha);
    }

    /// Jump every channel straight to its target (effects disabled).
    pub fn snap_to_targets(&mut self) {
        self.current_size = self.target_size;
        self.current_alpha = self.target_alpha;
        self.arrow_current_alpha = self.arrow_target_alpha;
        self.emblem_current_alpha = self.emblem_target_alpha;
    }

    /// True while any overlay still shows.
    pub fn overlays_visible(&self) -> bool {
        self.arrow_current_alpha > 0 || self.emblem_current_alpha > 0
    }

    /// Walk the staged hide/destroy collapse: overlays fade out
    /// strictly before the size shrinks to 1. Only meaningful once
    /// `converged()` holds in a terminal phase.
    pub fn stage_collapse(&mut self) -> Collapse {
        if self.overlays_visible() {
            self.arrow_target_alpha = 0;
            self.emblem_target_alpha = 0;
            Collapse::FadeOverlays
        } else if self.current_size > 1 {
            self.target_size = 1;
            Collapse::Shrink
        } else {
            Collapse::Finished
        }
    }

    /// Reset the entry values for an icon about to become visible: it
    /// grows from size 1 with the overlays faded out.
    pub fn reset_for_show(&mut self) {
        self.current_size = 1;
        self.arrow_current_alpha = 0;
        self.emblem_current_alpha = 0;
    }
}

fn step_size(current: u32, target: u32) -> u32 {
    if current > target {
        (current - SIZE_STEP).max(target)
    } else if current < target {
        (current + SIZE_STEP).min(target)
    } else {
        current
    }
}

fn step_alpha(current: u8, target: u8) -> u8 {
    if current > target {
        current.saturating_sub(ALPHA_STEP).max(target)
    } else if current < target {
        current.saturating_add(ALPHA_STEP).min(target)
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_converges_in_exact_steps() {
        let mut state = AnimationState::new(32);
        assert_eq!(state.current_size, 1);

        let mut ticks = 0;
        while !state.converged() {
            state.tick();
            ticks += 1;
            assert!(ticks <= 31, "size overshot its step bound");
        }
        assert_eq!(ticks, 31);
        assert_eq!(state.current_size, 32);

        // An extra tick is a no-op, never an overshoot.
        state.tick();
        assert_eq!(state.current_size, 32);
    }

    #[test]
    fn test_alpha_clamps_at_target() {
        let mut state = AnimationState::new(16);
        state.current_size = 16;
        state.current_alpha = 0;
        state.target_alpha = 12;

        state.tick();
        assert_eq!(state.current_alpha, 5);
        state.tick();
        assert_eq!(state.current_alpha, 10);
        state.tick();
        assert_eq!(state.current_alpha, 12);
        state.tick();
        assert_eq!(state.current_alpha, 12);
    }

    #[test]
    fn test_convergence_bound_for_any_pair() {
        for (current, target) in [(0u8, 255u8), (255, 0), (7, 203), (100, 99)] {
            let mut state = AnimationState::new(1);
            state.current_size = 1;
            state.current_alpha = current;
            state.target_alpha = target;
            let bound = (current.abs_diff(target) as u32).div_ceil(ALPHA_STEP as u32);
            let mut ticks = 0;
            while !state.converged() {
                state.tick();
                ticks += 1;
            }
            assert!(ticks <= bound, "{current}->{target} took {ticks} > {bound}");
            assert_eq!(state.current_alpha, target);
        }
    }

    #[test]
    fn test_collapse_fades_overlays_before_shrinking() {
        let mut state = AnimationState::new(32);
        state.current_size = 32;
        state.arrow_current_alpha = 255;
        state.arrow_target_alpha = 255;
        state.phase = Phase::Hiding;

        assert_eq!(state.stage_collapse(), Collapse::FadeOverlays);
        assert_eq!(state.arrow_target_alpha, 0);
        // Size target untouched while overlays fade.
        assert_eq!(state.target_size, 32);

        while !state.converged() {
            state.tick();
            assert_eq!(state.current_size, 32);
        }

        assert_eq!(state.stage_collapse(), Collapse::Shrink);
        assert_eq!(state.target_size, 1);
        while !state.converged() {
            state.tick();
        }
        assert_eq!(state.stage_collapse(), Collapse::Finished);
    }

    #[test]
    fn test_reset_for_show() {
        let mut state = AnimationState::new(32);
        state.current_size = 32;
        state.arrow_current_alpha = 80;
        state.emblem_current_alpha = 196;
        state.reset_for_show();
        assert_eq!(state.current_size, 1);
        assert_eq!(state.arrow_current_alpha, 0);
        assert_eq!(state.emblem_current_alpha, 0);
    }
}
