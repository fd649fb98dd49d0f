use std::collections::VecDeque;
use std::time::Duration;

use super::ReplayEvent;
use crate::button::ButtonEvent;

/// Drop interior events without buttons. The last event is kept regardless,
/// since it marks the end of the session.
pub fn prune(mut events: Vec<ReplayEvent>) -> Vec<ReplayEvent> {
    let Some(last) = events.pop() else {
        return events;
    };
    events.retain(|event| !event.buttons.is_empty());
    events.push(last);
    events
}

/// Pending replay events, consumed as the session clock advances.
#[derive(Debug, Clone, Default)]
pub struct ReplaySchedule {
    events: VecDeque<ReplayEvent>,
}

impl ReplaySchedule {
    /// Schedule `events` after pruning empty interior ones.
    pub fn new(events: Vec<ReplayEvent>) -> Self {
        Self {
            events: prune(events).into(),
        }
    }

    /// Buttons due at `elapsed`, in recorded order. Due events are consumed,
    /// including the final one which carries no buttons.
    pub fn replay_step(&mut self, elapsed: Duration) -> Vec<ButtonEvent> {
        let now_ms = elapsed.as_millis() as u64;
        let mut due = Vec::new();
        while self
            .events
            .front()
            .is_some_and(|event| event.timestamp_ms <= now_ms)
        {
            if let Some(event) = self.events.pop_front() {
                due.extend(event.buttons);
            }
        }
        due
    }

    /// Whether every event, including the end marker, has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.events.is_empty()
    }

    /// Events still to come.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Timestamp at which the session ends, if anything is scheduled.
    pub fn end(&self) -> Option<Duration> {
        self.events
            .back()
            .map(|event| Duration::from_millis(event.timestamp_ms))
    }
}
