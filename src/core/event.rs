use super::state::{ProcessId, Time};
use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

// Insertion sequence number; doubles as the event's key in the queue
pub type EventId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Arrival,
    Departure,
    Query,
    // Round robin quantum expiry
    Timeout,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub time: Time,
    pub kind: EventKind,
    pub process: Option<ProcessId>,
}

#[derive(Debug, Clone, Copy)]
struct EventKey {
    time: Time,
    seq: EventId,
}

// KeyedPriorityQueue is a max-heap, so the earliest (time, seq) must compare greatest
impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EventKey {}

/// Pending events, totally ordered by time with ties broken by insertion order.
#[derive(Debug)]
pub struct EventQueue {
    order: KeyedPriorityQueue<EventId, EventKey>,
    events: FxHashMap<EventId, Event>,
    next_seq: EventId,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            order: KeyedPriorityQueue::new(),
            events: FxHashMap::default(),
            next_seq: 0,
        }
    }

    /// Inserts an event. Times earlier than the current clock are accepted as-is.
    pub fn schedule(&mut self, time: Time, process: Option<ProcessId>, kind: EventKind) -> EventId {
        let seq = self.next_seq;
        self.next_seq += 1;

        self.order.push(seq, EventKey { time, seq });
        self.events.insert(
            seq,
            Event {
                time,
                kind,
                process,
            },
        );
        tracing::trace!(seq, time, ?kind, ?process, "event scheduled");
        seq
    }

    pub fn pop_earliest(&mut self) -> Option<Event> {
        let (seq, _) = self.order.pop()?;
        let event = self.events.remove(&seq);
        debug_assert!(event.is_some(), "Event {seq} missing payload");
        event
    }

    pub fn peek_time(&self) -> Option<Time> {
        self.order.peek().map(|(_, key)| key.time)
    }

    /// Removes every pending event of `kind` attached to `process`. Returns how many were removed;
    /// zero matches is not an error.
    pub fn cancel(&mut self, process: ProcessId, kind: EventKind) -> usize {
        let stale: Vec<EventId> = self
            .events
            .iter()
            .filter(|(_, ev)| ev.kind == kind && ev.process == Some(process))
            .map(|(&seq, _)| seq)
            .collect();

        for seq in &stale {
            self.order.remove(seq);
            self.events.remove(seq);
        }

        if !stale.is_empty() {
            tracing::trace!(process, ?kind, removed = stale.len(), "events cancelled");
        }
        stale.len()
    }

    pub fn contains(&self, process: ProcessId, kind: EventKind) -> bool {
        self.events
            .values()
            .any(|ev| ev.kind == kind && ev.process == Some(process))
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when anything other than periodic QUERY sampling is pending.
    pub fn has_pending_work(&self) -> bool {
        self.events.values().any(|ev| ev.kind != EventKind::Query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn drain(queue: &mut EventQueue) -> Vec<(Time, EventKind, Option<ProcessId>)> {
        let mut out = Vec::new();
        while let Some(ev) = queue.pop_earliest() {
            out.push((ev.time, ev.kind, ev.process));
        }
        out
    }

    #[test]
    fn pops_in_time_order() {
        let mut queue = EventQueue::new();
        queue.schedule(3.0, Some(1), EventKind::Departure);
        queue.schedule(1.0, Some(0), EventKind::Arrival);
        queue.schedule(2.5, None, EventKind::Query);

        assert_eq!(
            drain(&mut queue),
            vec![
                (1.0, EventKind::Arrival, Some(0)),
                (2.5, EventKind::Query, None),
                (3.0, EventKind::Departure, Some(1)),
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn ties_break_by_insertion_order() {
        let mut queue = EventQueue::new();
        queue.schedule(5.0, Some(2), EventKind::Departure);
        queue.schedule(5.0, None, EventKind::Query);
        queue.schedule(5.0, Some(3), EventKind::Arrival);
        queue.schedule(4.0, Some(4), EventKind::Arrival);

        let kinds: Vec<_> = drain(&mut queue).into_iter().map(|(_, k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Arrival,
                EventKind::Departure,
                EventKind::Query,
                EventKind::Arrival,
            ]
        );
    }

    #[test]
    fn cancel_removes_all_matches_only() {
        let mut queue = EventQueue::new();
        queue.schedule(1.0, Some(7), EventKind::Timeout);
        queue.schedule(2.0, Some(7), EventKind::Departure);
        queue.schedule(3.0, Some(7), EventKind::Timeout);
        queue.schedule(4.0, Some(8), EventKind::Timeout);

        assert_eq!(queue.cancel(7, EventKind::Timeout), 2);
        assert!(!queue.contains(7, EventKind::Timeout));
        assert_eq!(
            drain(&mut queue),
            vec![
                (2.0, EventKind::Departure, Some(7)),
                (4.0, EventKind::Timeout, Some(8)),
            ]
        );
    }

    #[test]
    fn cancel_missing_is_noop() {
        let mut queue = EventQueue::new();
        assert_eq!(queue.cancel(0, EventKind::Departure), 0);

        queue.schedule(1.0, Some(1), EventKind::Departure);
        assert_eq!(queue.cancel(1, EventKind::Timeout), 0);
        assert_eq!(queue.cancel(2, EventKind::Departure), 0);
        queue.schedule(0.5, None, EventKind::Query);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek_time(), Some(0.5));
        assert_eq!(
            drain(&mut queue),
            vec![
                (0.5, EventKind::Query, None),
                (1.0, EventKind::Departure, Some(1)),
            ]
        );
    }

    #[test]
    fn pending_work_ignores_queries() {
        let mut queue = EventQueue::new();
        queue.schedule(1.0, None, EventKind::Query);
        assert!(!queue.has_pending_work());
        queue.schedule(2.0, Some(0), EventKind::Arrival);
        assert!(queue.has_pending_work());
    }

    #[test]
    fn empty_pop_is_none() {
        let mut queue = EventQueue::new();
        assert_eq!(queue.pop_earliest(), None);
        assert_eq!(queue.peek_time(), None);
    }
}
