//! The driving port that feeds topology events to the controller.

use crate::domain::TopologyEvent;

/// Port that yields association and disassociation notifications in the
/// order they must be handled.
pub trait EventSource {
    /// Next pending event, or `None` once the source is exhausted.
    fn next_event(&mut self) -> Option<TopologyEvent>;
}

impl<T: EventSource + ?Sized> EventSource for &mut T {
    fn next_event(&mut self) -> Option<TopologyEvent> {
        (**self).next_event()
    }
}
