use serde::{Deserialize, Serialize};

use crate::interpret::Interpretation;

/// One candidate transcription of a spoken turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub utterance: String,
    pub confidence: f32,
}

/// Completed listen result: hypotheses ordered by descending confidence,
/// plus the service parse when the listen asked for one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    pub hypotheses: Vec<Hypothesis>,
    pub interpretation: Option<Interpretation>,
}

impl Recognition {
    /// Single-hypothesis recognition, no parse. Handy for drivers and tests.
    pub fn text(utterance: &str, confidence: f32) -> Self {
        Self {
            hypotheses: vec![Hypothesis {
                utterance: utterance.to_string(),
                confidence,
            }],
            interpretation: None,
        }
    }

    /// The engine always consults the best hypothesis first.
    pub fn best(&self) -> Option<&Hypothesis> {
        self.hypotheses.first()
    }
}

/// External signals the engine reacts to, one at a time.
#[derive(Debug, Clone)]
pub enum DmEvent {
    /// User-initiated start/advance from the surface.
    Start,
    /// The speech subsystem finished its readiness handshake.
    Ready,
    /// Synthesis of the last speak request completed.
    SpeakDone,
    /// Listen completed with a recognition.
    Recognised(Recognition),
    /// Listen timed out with zero hypotheses.
    NoInput,
}

/// Requests the engine issues to the speech subsystem.
///
/// DISCIPLINE: at most one request is outstanding per region. The engine
/// never issues the next speak or listen before the completion event for
/// the previous one arrived.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechCommand {
    Prepare,
    Speak { utterance: String },
    Listen { nlu: bool },
}
