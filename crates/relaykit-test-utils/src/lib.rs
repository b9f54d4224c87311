//! Test probes and fixtures for relaykit development.
//!
//! Provides a [`Probe`] that records every level a pin delivers, a
//! [`RecordingObserver`] that keeps owned copies of wire events, and
//! helpers for running the same scenario on every fan-out strategy.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::{Arc, Mutex};

use relaykit_core::{ComponentId, Observer, WireEvent};
use relaykit_wire::{Board, Delivery, Pin};

/// Both fan-out strategies, labelled for assertion messages.
pub fn boards() -> [(&'static str, Board); 2] {
    [("inline", Board::default()), ("threaded", Board::threaded())]
}

/// Two-input rows in the order `00, 10, 01, 11` (`a` varies fastest).
pub const TWO_INPUT_ROWS: [(bool, bool); 4] =
    [(false, false), (true, false), (false, true), (true, true)];

/// Every assignment of `width` inputs, counting up from all-false.
/// Input 0 is the least significant position.
pub fn all_rows(width: usize) -> Vec<Vec<bool>> {
    (0..1u32 << width)
        .map(|n| (0..width).map(|i| n >> i & 1 == 1).collect())
        .collect()
}

/// Parse a `0`/`1` string into levels. Panics on anything else.
pub fn levels(bits: &str) -> Vec<bool> {
    bits.chars()
        .map(|c| match c {
            '0' => false,
            '1' => true,
            other => panic!("not a bit: {other:?}"),
        })
        .collect()
}

/// Records every level delivered by one pin, hot-wire delivery included.
pub struct Probe {
    seen: Arc<Mutex<Vec<bool>>>,
}

impl Probe {
    pub fn attach(pin: &dyn Pin) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        pin.publisher()
            .subscribe(move |signal| {
                sink.lock().unwrap().push(signal.value());
                Delivery::Delivered
            })
            .expect("probe subscription faulted");
        Self { seen }
    }

    /// Every level seen so far, oldest first.
    pub fn seen(&self) -> Vec<bool> {
        self.seen.lock().unwrap().clone()
    }

    /// Number of deliveries so far.
    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// The most recent level, if any was delivered.
    pub fn last(&self) -> Option<bool> {
        self.seen.lock().unwrap().last().copied()
    }
}

/// An owned copy of a [`WireEvent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedEvent {
    pub category: &'static str,
    pub component: ComponentId,
    pub message: String,
}

/// Observer that keeps every event it receives.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A board reporting to `observer`.
    pub fn board(observer: &Arc<Self>) -> Board {
        Board::with_observer(Arc::clone(observer) as Arc<dyn Observer>)
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Number of recorded events in `category`.
    pub fn count(&self, category: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.category == category)
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl Observer for RecordingObserver {
    fn observe(&self, event: &WireEvent<'_>) {
        self.events.lock().unwrap().push(RecordedEvent {
            category: event.category(),
            component: event.component(),
            message: event.to_string(),
        });
    }
}
