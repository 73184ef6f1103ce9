// 8.0 engine/core.rs: clock and audit trail shared by the account operations.

use crate::account::Account;
use crate::events::{Event, EventId, EventPayload};
use crate::types::Timestamp;
use std::collections::vec_deque::{self, VecDeque};

impl Account {
    pub fn set_time(&mut self, timestamp: Timestamp) {
        self.current_time = timestamp;
    }

    pub fn time(&self) -> Timestamp {
        self.current_time
    }

    pub fn advance_time(&mut self, millis: i64) {
        self.current_time = Timestamp::from_millis(self.current_time.as_millis() + millis);
    }

    pub fn recent_events(&self, count: usize) -> vec_deque::Iter<'_, Event> {
        let start = self.events.len().saturating_sub(count);
        self.events.range(start..)
    }

    pub fn events(&self) -> &VecDeque<Event> {
        &self.events
    }

    pub(super) fn emit_event(&mut self, payload: EventPayload) {
        let event = Event::new(EventId(self.next_event_id), self.current_time, payload);
        self.next_event_id += 1;

        tracing::trace!(id = event.id.0, payload = ?event.payload, "account event");

        self.events.push_back(event);
        while self.events.len() > self.max_events {
            self.events.pop_front();
        }
    }
}
