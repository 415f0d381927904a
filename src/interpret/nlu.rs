use super::{Interpretation, Interpreter, SlotFrame};
use crate::kernel::event::Recognition;

/// Entity categories produced by the conversation-analysis deployment.
pub const CAT_PERSON: &str = "meeting_person";
pub const CAT_DAY: &str = "meeting_day";
pub const CAT_TIME: &str = "meeting_time";
pub const CAT_YES: &str = "yes";
pub const CAT_NO: &str = "no";

/// Statistical strategy: slots come from category-tagged entity spans,
/// independent of surface form, so one utterance can fill several slots.
pub struct NluInterpreter;

impl NluInterpreter {
    fn entity_text(parse: &Interpretation, category: &str) -> Option<String> {
        parse
            .entities
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.text.clone())
    }

    /// Yes and no in the same turn cancel out to "no answer". The
    /// ambiguity is intentional and feeds the invalid-input path.
    fn polar(parse: &Interpretation) -> Option<bool> {
        let yes = parse.entities.iter().any(|e| e.category == CAT_YES);
        let no = parse.entities.iter().any(|e| e.category == CAT_NO);
        match (yes, no) {
            (true, true) => None,
            (true, false) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }
}

impl Interpreter for NluInterpreter {
    fn wants_nlu(&self) -> bool {
        true
    }

    fn interpret(&self, recognition: &Recognition) -> SlotFrame {
        let Some(parse) = recognition.interpretation.as_ref() else {
            return SlotFrame::default();
        };
        SlotFrame {
            person: Self::entity_text(parse, CAT_PERSON),
            day: Self::entity_text(parse, CAT_DAY),
            time: Self::entity_text(parse, CAT_TIME),
            polar: Self::polar(parse),
            intent: Some(parse.top_intent),
        }
    }
}
