//! Interpretation strategies: turning one recognized user turn into
//! candidate slot values.
//!
//! Two interchangeable strategies implement [`Interpreter`]: an exact-match
//! lexical grammar and an entity-based NLU parse. Both are best-effort.
//! A turn that matches nothing yields an empty [`SlotFrame`], never an error.

pub mod grammar;
pub mod nlu;

use serde::{Deserialize, Serialize};

use crate::kernel::event::Recognition;

pub use grammar::LexicalInterpreter;
pub use nlu::NluInterpreter;

/// Structured parse returned by the conversation-analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub top_intent: TopIntent,
    pub entities: Vec<Entity>,
}

/// One category-tagged span from the parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub category: String,
    pub text: String,
}

/// Closed set of intents the engine reacts to. Anything the service
/// reports outside this set maps to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopIntent {
    CreateMeeting,
    WhoIs,
    Unknown,
}

impl TopIntent {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "create_meeting" => TopIntent::CreateMeeting,
            "who_is_x" => TopIntent::WhoIs,
            _ => TopIntent::Unknown,
        }
    }
}

/// Best-effort slot values extracted from one user turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotFrame {
    pub person: Option<String>,
    pub day: Option<String>,
    pub time: Option<String>,
    /// Yes/no answer. `None` covers both "no answer heard" and the
    /// indeterminate case where the same turn carries yes AND no.
    pub polar: Option<bool>,
    /// Session-level intent, when the strategy produces one.
    pub intent: Option<TopIntent>,
}

impl SlotFrame {
    pub fn is_empty(&self) -> bool {
        self.person.is_none() && self.day.is_none() && self.time.is_none() && self.polar.is_none()
    }
}

/// Interpretation strategy, injected into the engine at construction.
/// `wants_nlu` decides whether listen requests ask for a parse; the
/// completed recognition comes back through `interpret`.
pub trait Interpreter: Send + Sync {
    fn wants_nlu(&self) -> bool;
    fn interpret(&self, recognition: &Recognition) -> SlotFrame;
}
