use std::sync::{Mutex, PoisonError};

use crate::domain::StoreEvent;
use crate::ports::EventSink;

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: StoreEvent) {}
}

/// Keeps every event in arrival order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<StoreEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StoreEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain what was recorded so far.
    pub fn take(&self) -> Vec<StoreEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn failures(&self) -> Vec<StoreEvent> {
        self.events()
            .into_iter()
            .filter(StoreEvent::is_failure)
            .collect()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: StoreEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Operation;

    #[test]
    fn records_and_drains() {
        let sink = RecordingEventSink::new();
        sink.emit(StoreEvent::Loaded { count: 2 });
        sink.emit(StoreEvent::OperationFailed {
            op: Operation::Delete,
            message: "Failed to delete task".into(),
        });

        assert_eq!(sink.failures().len(), 1);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.events().is_empty());
    }
}
