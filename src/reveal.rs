//! Scroll-reactive visibility coordinator.
//!
//! One [`RevealCoordinator`] exists per observed region. It combines the
//! region's intersection state with the shared scroll direction into a single
//! `is_revealed` flag. Reveal is sticky while the reader scrolls down and only
//! retracts when they scroll back up past the region.

use crate::scroll::{ScrollDirection, ScrollSample};

/// Fraction of the region that must be visible to count as intersecting.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// When a revealed region is allowed to hide again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retract {
    /// Hide only when the region leaves while the last scroll went up.
    #[default]
    OnScrollUp,
    /// Hide whenever the region leaves the viewport.
    OnExit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    pub threshold: f64,
    pub retract: Retract,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            retract: Retract::OnScrollUp,
        }
    }
}

/// Where concealed content rests before it animates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    OffsetLeft,
    OffsetRight,
    Below,
    Shrunk,
    Grown,
    InPlace,
}

impl Pose {
    pub fn class(self) -> &'static str {
        match self {
            Pose::OffsetLeft => "reveal-off-left",
            Pose::OffsetRight => "reveal-off-right",
            Pose::Below => "reveal-off-below",
            Pose::Shrunk => "reveal-shrunk",
            Pose::Grown => "reveal-grown",
            Pose::InPlace => "reveal-faded",
        }
    }
}

/// Class applied to revealed content.
pub const REVEALED_CLASS: &str = "reveal-shown";

/// Every class [`MotionMap::class_for`] can return, for clearing stale ones.
pub const ALL_CLASSES: [&str; 7] = [
    REVEALED_CLASS,
    "reveal-off-left",
    "reveal-off-right",
    "reveal-off-below",
    "reveal-shrunk",
    "reveal-grown",
    "reveal-faded",
];

/// Observable phase of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Revealed,
    /// `retreating` is true when the last scroll movement was upward.
    Concealed { retreating: bool },
}

/// Concealed pose per scroll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionMap {
    pub descending: Pose,
    pub retreating: Pose,
}

impl MotionMap {
    pub const FADE: Self = Self::new(Pose::InPlace, Pose::InPlace);

    pub const fn new(descending: Pose, retreating: Pose) -> Self {
        Self {
            descending,
            retreating,
        }
    }

    /// Parse a `data-reveal` attribute value. Unknown values fade in place.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "left" => Self::new(Pose::OffsetLeft, Pose::OffsetRight),
            "right" => Self::new(Pose::OffsetRight, Pose::OffsetLeft),
            "rise" => Self::new(Pose::Below, Pose::InPlace),
            "rise-fixed" => Self::new(Pose::Below, Pose::Below),
            "zoom" => Self::new(Pose::Grown, Pose::Shrunk),
            "pop" => Self::new(Pose::Shrunk, Pose::Grown),
            _ => Self::FADE,
        }
    }

    pub fn class_for(&self, phase: RevealPhase) -> &'static str {
        match phase {
            RevealPhase::Revealed => REVEALED_CLASS,
            RevealPhase::Concealed { retreating: true } => self.retreating.class(),
            RevealPhase::Concealed { retreating: false } => self.descending.class(),
        }
    }
}

impl Default for MotionMap {
    fn default() -> Self {
        Self::FADE
    }
}

/// Fill width for a skill bar inside a region.
pub fn skill_bar_width(revealed: bool, level: u8) -> String {
    if revealed {
        format!("{}%", level.min(100))
    } else {
        "0%".to_owned()
    }
}

/// Per-region observation state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollObservationState {
    pub is_intersecting: bool,
    pub is_revealed: bool,
    pub scroll_direction: ScrollDirection,
    pub last_scroll_offset: f64,
}

/// A change of `is_revealed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealTransition {
    Revealed,
    Concealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Lifecycle {
    #[default]
    Detached,
    Observing,
    TornDown,
}

#[derive(Debug, Clone, Default)]
pub struct RevealCoordinator {
    config: RevealConfig,
    state: ScrollObservationState,
    lifecycle: Lifecycle,
}

impl RevealCoordinator {
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            state: ScrollObservationState::default(),
            lifecycle: Lifecycle::Detached,
        }
    }

    /// Begin observation with the scroll offset sampled at mount time.
    ///
    /// A coordinator that was torn down can be mounted again; its reveal state
    /// starts over.
    pub fn mount(&mut self, initial_offset: f64) {
        if self.lifecycle == Lifecycle::Observing {
            return;
        }
        self.state = ScrollObservationState {
            last_scroll_offset: initial_offset,
            ..ScrollObservationState::default()
        };
        self.lifecycle = Lifecycle::Observing;
    }

    /// Stop observation. Safe to call repeatedly or before [`mount`](Self::mount).
    pub fn unmount(&mut self) {
        if self.lifecycle == Lifecycle::Observing {
            self.lifecycle = Lifecycle::TornDown;
        }
    }

    pub fn is_observing(&self) -> bool {
        self.lifecycle == Lifecycle::Observing
    }

    pub fn on_intersection(&mut self, intersecting: bool) -> Option<RevealTransition> {
        if !self.is_observing() {
            return None;
        }
        self.state.is_intersecting = intersecting;

        let was = self.state.is_revealed;
        if intersecting {
            self.state.is_revealed = true;
        } else if self.may_retract() {
            self.state.is_revealed = false;
        }

        match (was, self.state.is_revealed) {
            (false, true) => Some(RevealTransition::Revealed),
            (true, false) => Some(RevealTransition::Concealed),
            _ => None,
        }
    }

    pub fn on_scroll(&mut self, sample: ScrollSample) {
        if !self.is_observing() {
            return;
        }
        self.state.scroll_direction = sample.direction;
        self.state.last_scroll_offset = sample.offset;
    }

    fn may_retract(&self) -> bool {
        match self.config.retract {
            Retract::OnExit => true,
            Retract::OnScrollUp => self.state.scroll_direction == ScrollDirection::Up,
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.state.is_revealed
    }

    pub fn phase(&self) -> RevealPhase {
        if self.state.is_revealed {
            RevealPhase::Revealed
        } else {
            RevealPhase::Concealed {
                retreating: self.state.scroll_direction == ScrollDirection::Up,
            }
        }
    }

    pub fn state(&self) -> &ScrollObservationState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn down(offset: f64) -> ScrollSample {
        ScrollSample {
            offset,
            direction: ScrollDirection::Down,
        }
    }

    fn up(offset: f64) -> ScrollSample {
        ScrollSample {
            offset,
            direction: ScrollDirection::Up,
        }
    }

    fn mounted(retract: Retract) -> RevealCoordinator {
        let mut c = RevealCoordinator::new(RevealConfig {
            retract,
            ..RevealConfig::default()
        });
        c.mount(0.0);
        c
    }

    #[test]
    fn entering_reveals_regardless_of_direction() {
        let mut c = mounted(Retract::OnScrollUp);
        c.on_scroll(up(10.0));
        assert_eq!(c.on_intersection(true), Some(RevealTransition::Revealed));
        assert!(c.is_revealed());
        assert_eq!(c.on_intersection(true), None);
    }

    #[test]
    fn leaving_downward_stays_revealed() {
        let mut c = mounted(Retract::OnScrollUp);
        c.on_intersection(true);
        c.on_scroll(down(900.0));
        assert_eq!(c.on_intersection(false), None);
        assert!(c.is_revealed());
        assert!(!c.state().is_intersecting);
    }

    #[test]
    fn leaving_upward_conceals() {
        let mut c = mounted(Retract::OnScrollUp);
        c.on_intersection(true);
        c.on_scroll(up(100.0));
        assert_eq!(c.on_intersection(false), Some(RevealTransition::Concealed));
        assert_eq!(c.phase(), RevealPhase::Concealed { retreating: true });
    }

    #[test]
    fn leaving_before_any_scroll_stays_revealed() {
        let mut c = mounted(Retract::OnScrollUp);
        c.on_intersection(true);
        assert_eq!(c.on_intersection(false), None);
    }

    #[test]
    fn exit_policy_hides_on_any_exit() {
        let mut c = mounted(Retract::OnExit);
        c.on_intersection(true);
        c.on_scroll(down(400.0));
        assert_eq!(c.on_intersection(false), Some(RevealTransition::Concealed));
        assert_eq!(c.phase(), RevealPhase::Concealed { retreating: false });
    }

    #[test]
    fn events_after_unmount_are_ignored() {
        let mut c = mounted(Retract::OnScrollUp);
        c.unmount();
        assert_eq!(c.on_intersection(true), None);
        c.on_scroll(up(3.0));
        assert_eq!(*c.state(), ScrollObservationState::default());
    }

    #[test]
    fn unmount_is_idempotent_and_allowed_before_mount() {
        let mut never = RevealCoordinator::default();
        never.unmount();
        never.unmount();
        assert!(!never.is_observing());

        let mut c = mounted(Retract::OnScrollUp);
        c.unmount();
        c.unmount();
        assert!(!c.is_observing());
    }

    #[test]
    fn remount_restarts_from_new_offset() {
        let mut c = mounted(Retract::OnScrollUp);
        c.on_intersection(true);
        c.unmount();
        c.mount(250.0);
        assert!(!c.is_revealed());
        assert_eq!(c.state().last_scroll_offset, 250.0);
    }

    #[test]
    fn motion_classes_follow_direction() {
        let left = MotionMap::parse("left");
        assert_eq!(left.class_for(RevealPhase::Revealed), REVEALED_CLASS);
        assert_eq!(
            left.class_for(RevealPhase::Concealed { retreating: false }),
            "reveal-off-left"
        );
        assert_eq!(
            left.class_for(RevealPhase::Concealed { retreating: true }),
            "reveal-off-right"
        );
        assert_eq!(MotionMap::parse("sideways"), MotionMap::FADE);
        assert_eq!(MotionMap::parse(" zoom "), MotionMap::new(Pose::Grown, Pose::Shrunk));
    }

    #[test]
    fn skill_bars_fill_only_when_revealed() {
        assert_eq!(skill_bar_width(true, 85), "85%");
        assert_eq!(skill_bar_width(true, 140), "100%");
        assert_eq!(skill_bar_width(false, 85), "0%");
    }
}
