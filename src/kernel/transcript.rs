//! Bounded session transcript.
//!
//! Read-only observability layer. Never consulted by decision logic; it
//! exists for the surface and for post-session inspection.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

const MAX_TURNS: usize = 1_000;

/// One entry in the session transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnEvent {
    Prompted { utterance: String },
    Heard { utterance: String, confidence: f32 },
    NoInput,
    Rejected { utterance: String },
    Booked,
    SlotsReset,
}

/// Counters computed over the transcript, published with every snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// User turns that produced a recognition.
    pub turns: u64,
    pub no_inputs: u64,
    pub rejections: u64,
    pub resets: u64,
    pub booked: bool,
}

#[derive(Debug, Default)]
pub struct Transcript {
    buffer: VecDeque<TurnEvent>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(64),
        }
    }

    pub fn record(&mut self, event: TurnEvent) {
        if self.buffer.len() >= MAX_TURNS {
            self.buffer.pop_front();
        }
        self.buffer.push_back(event);
    }

    pub fn stats(&self) -> SessionStats {
        compute_stats(&self.buffer)
    }

    pub fn events(&self) -> impl Iterator<Item = &TurnEvent> {
        self.buffer.iter()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Pure fold over the transcript buffer.
pub fn compute_stats(events: &VecDeque<TurnEvent>) -> SessionStats {
    let mut stats = SessionStats::default();
    for event in events {
        match event {
            TurnEvent::Heard { .. } => stats.turns += 1,
            TurnEvent::NoInput => stats.no_inputs += 1,
            TurnEvent::Rejected { .. } => stats.rejections += 1,
            TurnEvent::SlotsReset => stats.resets += 1,
            TurnEvent::Booked => stats.booked = true,
            TurnEvent::Prompted { .. } => {}
        }
    }
    stats
}
