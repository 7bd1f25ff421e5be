//! Animated primary/secondary emphasis of legend participants.
//!
//! A change of highlight does not swap styles instantly. Each participant
//! owns a [`Transition`] of its opacity. A new highlight replaces every
//! transition whose target changed with one that starts from the current
//! value; the host's frame clock advances them.

use std::{collections::BTreeMap, time::Duration};

use crate::anchor::AnchorIndex;

/// Opacity of the primary style.
pub const PRIMARY_OPACITY: f32 = 1.0;

/// An eased interpolation between two values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
}

impl Transition {
    /// A transition that already rests at `value`.
    pub fn settled(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            duration: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Value the transition is heading to.
    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Current value, eased with smoothstep.
    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        let t = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        let eased = t * t * (3.0 - 2.0 * t);
        self.from + (self.to - self.from) * eased
    }

    /// Moves the transition forward by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }
}

/// Opacity animations of every legend participant, keyed by index.
#[derive(Debug, Clone)]
pub struct EmphasisTracker {
    secondary_opacity: f32,
    duration: Duration,
    transitions: BTreeMap<AnchorIndex, Transition>,
    highlight: Option<AnchorIndex>,
}

impl EmphasisTracker {
    pub fn new(secondary_opacity: f32, duration: Duration) -> Self {
        Self {
            secondary_opacity,
            duration,
            transitions: BTreeMap::new(),
            highlight: None,
        }
    }

    fn target_for(&self, index: AnchorIndex) -> f32 {
        match self.highlight {
            Some(current) if current != index => self.secondary_opacity,
            _ => PRIMARY_OPACITY,
        }
    }

    /// Sets the tracked participants after a layout pass.
    ///
    /// Participants that were already tracked keep their running transition.
    /// New ones start settled at their current target.
    pub fn track(&mut self, indices: impl IntoIterator<Item = AnchorIndex>) {
        let mut transitions = BTreeMap::new();
        for index in indices {
            let transition = self
                .transitions
                .get(&index)
                .copied()
                .unwrap_or_else(|| Transition::settled(self.target_for(index)));
            transitions.insert(index, transition);
        }
        self.transitions = transitions;
    }

    /// Retargets every participant for a new highlight.
    pub fn apply(&mut self, highlight: Option<AnchorIndex>) {
        self.highlight = highlight;
        let targets: Vec<(AnchorIndex, f32)> = self
            .transitions
            .keys()
            .map(|&index| (index, self.target_for(index)))
            .collect();

        for (index, target) in targets {
            let Some(transition) = self.transitions.get_mut(&index) else {
                continue;
            };
            if transition.target() != target {
                *transition = Transition::new(transition.value(), target, self.duration);
            }
        }
    }

    /// Advances all running transitions.
    pub fn advance(&mut self, dt: Duration) {
        for transition in self.transitions.values_mut() {
            transition.advance(dt);
        }
    }

    /// Jumps every transition to its end.
    pub fn settle(&mut self) {
        for transition in self.transitions.values_mut() {
            *transition = Transition::settled(transition.target());
        }
    }

    /// Current opacity of `index`. Untracked indices are fully opaque.
    pub fn opacity(&self, index: AnchorIndex) -> f32 {
        self.transitions
            .get(&index)
            .map_or(PRIMARY_OPACITY, Transition::value)
    }

    pub fn is_animating(&self) -> bool {
        self.transitions.values().any(|t| !t.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    const MS_100: Duration = Duration::from_millis(100);

    fn idx(i: usize) -> AnchorIndex {
        AnchorIndex::new(i)
    }

    #[test]
    fn test_transition_eases_between_values() {
        let mut transition = Transition::new(1.0, 0.0, MS_100);
        assert_approx_eq!(f32, transition.value(), 1.0);

        transition.advance(Duration::from_millis(50));
        assert_approx_eq!(f32, transition.value(), 0.5);
        assert!(!transition.is_finished());

        transition.advance(MS_100);
        assert!(transition.is_finished());
        assert_approx_eq!(f32, transition.value(), 0.0);
    }

    #[test]
    fn test_retarget_midway_starts_from_current_value() {
        let mut tracker = EmphasisTracker::new(0.0, MS_100);
        tracker.track([idx(0), idx(1)]);
        tracker.apply(Some(idx(1)));
        tracker.advance(Duration::from_millis(30));
        let dimmed = tracker.opacity(idx(0));
        assert!(dimmed < 1.0 && dimmed > 0.0);

        tracker.apply(None);
        assert_approx_eq!(f32, tracker.opacity(idx(0)), dimmed);
        assert!(tracker.is_animating());
    }

    #[test]
    fn test_highlight_dims_others() {
        let mut tracker = EmphasisTracker::new(0.4, MS_100);
        tracker.track([idx(0), idx(1), idx(2)]);

        tracker.apply(Some(idx(1)));
        assert!(tracker.is_animating());

        tracker.advance(MS_100);
        assert!(!tracker.is_animating());
        assert_approx_eq!(f32, tracker.opacity(idx(0)), 0.4);
        assert_approx_eq!(f32, tracker.opacity(idx(1)), 1.0);
        assert_approx_eq!(f32, tracker.opacity(idx(2)), 0.4);

        tracker.apply(None);
        tracker.settle();
        assert_approx_eq!(f32, tracker.opacity(idx(0)), 1.0);
    }

    #[test]
    fn test_unchanged_highlight_does_not_restart() {
        let mut tracker = EmphasisTracker::new(0.4, MS_100);
        tracker.track([idx(0), idx(1)]);
        tracker.apply(Some(idx(1)));
        tracker.advance(MS_100);

        tracker.apply(Some(idx(1)));
        assert!(!tracker.is_animating());
    }

    #[test]
    fn test_track_keeps_running_transitions() {
        let mut tracker = EmphasisTracker::new(0.4, MS_100);
        tracker.track([idx(0), idx(1)]);
        tracker.apply(Some(idx(1)));
        tracker.advance(Duration::from_millis(50));
        let midway = tracker.opacity(idx(0));

        tracker.track([idx(0), idx(1), idx(5)]);
        assert_approx_eq!(f32, tracker.opacity(idx(0)), midway);
        // Newly tracked participants start at their settled style
        assert_approx_eq!(f32, tracker.opacity(idx(5)), 0.4);
    }
}
