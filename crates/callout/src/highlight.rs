//! The single "currently highlighted" legend item of a diagram.
//!
//! Regions and legend rows live in unrelated parts of the layout tree and
//! share nothing but an [`AnchorIndex`]. Both hold a clone of the same
//! [`HighlightCoordinator`]: hovering either side writes the shared cell, and
//! every participant reads it to pick its primary or secondary style.
//!
//! Everything runs on one thread, so the cell is an `Rc<Cell<_>>` and the
//! last write wins.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use log::debug;

use crate::anchor::AnchorIndex;

type Listener = Box<dyn Fn(Option<AnchorIndex>)>;

#[derive(Default)]
struct Shared {
    current: Cell<Option<AnchorIndex>>,
    listeners: RefCell<Vec<Listener>>,
}

/// Shared, observable `Option<AnchorIndex>`.
///
/// Clones observe and mutate the same state.
///
/// # Examples
///
/// ```
/// # use callout::{anchor::AnchorIndex, highlight::HighlightCoordinator};
/// let coordinator = HighlightCoordinator::new();
/// let legend_side = coordinator.clone();
///
/// coordinator.set_highlight(AnchorIndex::new(2));
/// assert_eq!(legend_side.read(), Some(AnchorIndex::new(2)));
/// assert!(!legend_side.is_primary(AnchorIndex::new(0)));
///
/// legend_side.clear();
/// assert!(coordinator.is_primary(AnchorIndex::new(0)));
/// ```
#[derive(Clone, Default)]
pub struct HighlightCoordinator {
    shared: Rc<Shared>,
}

impl HighlightCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the highlighted index, if any.
    pub fn read(&self) -> Option<AnchorIndex> {
        self.shared.current.get()
    }

    /// Returns true if `index` is the highlighted item.
    pub fn is_highlighted(&self, index: AnchorIndex) -> bool {
        self.read() == Some(index)
    }

    /// Returns true if `index` should use the primary style: nothing is
    /// highlighted, or `index` is.
    pub fn is_primary(&self, index: AnchorIndex) -> bool {
        self.read().is_none_or(|current| current == index)
    }

    /// Highlights `index`, replacing any previous highlight.
    pub fn set_highlight(&self, index: AnchorIndex) {
        self.write(Some(index));
    }

    /// Removes the highlight.
    pub fn clear(&self) {
        self.write(None);
    }

    /// Applies a pointer hover event of a participant with id `index`.
    ///
    /// Entering highlights it, leaving clears the highlight.
    pub fn hover(&self, index: AnchorIndex, active: bool) {
        if active {
            self.set_highlight(index);
        } else {
            self.clear();
        }
    }

    /// Registers a listener called after every change of the highlight.
    ///
    /// Listeners must not subscribe further listeners while being notified.
    pub fn subscribe(&self, listener: impl Fn(Option<AnchorIndex>) + 'static) {
        self.shared.listeners.borrow_mut().push(Box::new(listener));
    }

    fn write(&self, value: Option<AnchorIndex>) {
        let previous = self.shared.current.replace(value);
        if previous == value {
            return;
        }

        debug!(previous:?, current:? = value; "Highlight changed");
        for listener in self.shared.listeners.borrow().iter() {
            listener(value);
        }
    }
}

impl fmt::Debug for HighlightCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighlightCoordinator")
            .field("current", &self.read())
            .field("listeners", &self.shared.listeners.borrow().len())
            .finish()
    }
}

/// Something the pointer can hover that takes part in highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Participant {
    /// An annotated region of the diagram
    Region(AnchorIndex),
    /// A row of the legend
    LegendRow(AnchorIndex),
}

impl Participant {
    /// Returns the shared id of the participant.
    pub fn index(self) -> AnchorIndex {
        match self {
            Self::Region(index) | Self::LegendRow(index) => index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(i: usize) -> AnchorIndex {
        AnchorIndex::new(i)
    }

    #[test]
    fn test_starts_without_highlight() {
        let coordinator = HighlightCoordinator::new();
        assert_eq!(coordinator.read(), None);
        assert!(coordinator.is_primary(idx(0)));
        assert!(!coordinator.is_highlighted(idx(0)));
    }

    #[test]
    fn test_new_highlight_replaces_previous() {
        let coordinator = HighlightCoordinator::new();
        coordinator.set_highlight(idx(1));
        coordinator.set_highlight(idx(3));

        let highlighted: Vec<_> = (0..5).filter(|&i| coordinator.is_highlighted(idx(i))).collect();
        assert_eq!(highlighted, vec![3]);
    }

    #[test]
    fn test_region_hover_styles_legend_rows() {
        let region_side = HighlightCoordinator::new();
        let legend_side = region_side.clone();

        region_side.hover(idx(2), true);
        let primary: Vec<_> = (0..5).filter(|&i| legend_side.is_primary(idx(i))).collect();
        assert_eq!(primary, vec![2]);

        region_side.hover(idx(2), false);
        assert!((0..5).all(|i| legend_side.is_primary(idx(i))));
    }

    #[test]
    fn test_leave_from_other_side_clears() {
        let coordinator = HighlightCoordinator::new();
        coordinator.hover(idx(4), true);
        coordinator.clone().hover(idx(4), false);
        assert_eq!(coordinator.read(), None);
    }

    #[test]
    fn test_listeners_notified_only_on_change() {
        let coordinator = HighlightCoordinator::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        coordinator.subscribe(move |value| sink.borrow_mut().push(value));

        coordinator.set_highlight(idx(1));
        coordinator.set_highlight(idx(1));
        coordinator.clear();
        coordinator.clear();

        assert_eq!(*seen.borrow(), vec![Some(idx(1)), None]);
    }

    #[test]
    fn test_participant_index() {
        assert_eq!(Participant::Region(idx(7)).index(), idx(7));
        assert_eq!(Participant::LegendRow(idx(8)).index(), idx(8));
    }
}
