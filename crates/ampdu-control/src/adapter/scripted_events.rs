//! Event source replaying a prepared script.

use std::collections::VecDeque;

use crate::domain::TopologyEvent;
use crate::port::EventSource;

/// Replays events in timestamp order.
///
/// The script is sorted once at construction; events sharing a timestamp keep
/// their original relative order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvents {
    pending: VecDeque<TopologyEvent>,
}

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = TopologyEvent>) -> Self {
        let mut events: Vec<TopologyEvent> = events.into_iter().collect();
        // `sort_by` is stable.
        events.sort_by(|a, b| a.timestamp().total_cmp(&b.timestamp()));
        Self {
            pending: events.into(),
        }
    }

    /// Number of events not yet delivered.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self) -> Option<TopologyEvent> {
        self.pending.pop_front()
    }
}

impl Iterator for ScriptedEvents {
    type Item = TopologyEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MacAddr;

    #[test]
    fn replays_in_time_order_with_stable_ties() {
        let ap = MacAddr::from_index(1);
        let mut src = ScriptedEvents::new(vec![
            TopologyEvent::association(3, ap, 5.0),
            TopologyEvent::association(1, ap, 1.0),
            TopologyEvent::disassociation(1, ap, 5.0),
            TopologyEvent::association(2, ap, 1.0),
        ]);
        assert_eq!(src.remaining(), 4);

        let order: Vec<_> = std::iter::from_fn(|| src.next_event())
            .map(|e| (e.station_id(), e.timestamp()))
            .collect();
        assert_eq!(order, vec![(1, 1.0), (2, 1.0), (3, 5.0), (1, 5.0)]);
        assert!(src.is_empty());
    }
}
