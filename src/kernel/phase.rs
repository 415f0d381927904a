use serde::{Deserialize, Serialize};

use super::region::RegionId;

/// Where a region currently is in its prompt/listen cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionStep {
    /// Synthesis of the region prompt is in flight.
    Prompt,
    /// A listen request is in flight.
    Ask,
}

/// Top-level machine phase. Transitions happen only inside
/// `Engine::handle`, one external event at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the speech subsystem readiness handshake.
    Prepare,
    /// Ready, waiting for the user to start a session.
    Idle,
    Greeting(RegionStep),
    /// Inside the appointment composite, in one slot region.
    Region { id: RegionId, step: RegionStep },
    /// Speaking the "can't hear you" reprompt.
    NoInputReprompt,
    /// Speaking the "not an option" echo.
    InvalidReprompt,
    /// Speaking the side answer to a who-is question.
    WhoIs,
    /// Speaking the booking confirmation.
    Confirmed,
    /// Session finished, waiting for a restart.
    Done,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Prepare
    }
}

impl Phase {
    /// Human-readable label for the surface. Display only.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Prepare => "preparing",
            Phase::Idle => "waiting to start",
            Phase::Greeting(RegionStep::Prompt) => "greeting",
            Phase::Greeting(RegionStep::Ask) => "listening",
            Phase::Region {
                id,
                step: RegionStep::Prompt,
            } => id.label(),
            Phase::Region { .. } => "listening",
            Phase::NoInputReprompt => "reprompting after silence",
            Phase::InvalidReprompt => "reprompting after invalid input",
            Phase::WhoIs => "answering",
            Phase::Confirmed => "booking confirmed",
            Phase::Done => "done",
        }
    }
}
