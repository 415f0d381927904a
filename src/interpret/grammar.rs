use super::{Interpreter, SlotFrame};
use crate::kernel::event::Recognition;

/// One row of the lexical grammar. The table is partitioned by category:
/// a key contributes to exactly one slot, so person, day, time and yes/no
/// keys can never collide in a single turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrammarEntry {
    pub person: Option<String>,
    pub day: Option<String>,
    pub time: Option<String>,
    pub polar: Option<bool>,
}

fn person(name: &str) -> GrammarEntry {
    GrammarEntry {
        person: Some(name.to_string()),
        ..GrammarEntry::default()
    }
}

fn day(name: &str) -> GrammarEntry {
    GrammarEntry {
        day: Some(name.to_string()),
        ..GrammarEntry::default()
    }
}

fn polar(value: bool) -> GrammarEntry {
    GrammarEntry {
        polar: Some(value),
        ..GrammarEntry::default()
    }
}

/// Exact, case-insensitive lookup. A missing key contributes no value.
pub fn lookup(utterance: &str) -> Option<GrammarEntry> {
    let key = utterance.trim().to_lowercase();

    // Hours are spoken as two digits, "07" through "23".
    if key.len() == 2 && key.chars().all(|c| c.is_ascii_digit()) {
        let hour: u8 = key.parse().ok()?;
        if (7..=23).contains(&hour) {
            return Some(GrammarEntry {
                time: Some(format!("{hour:02}:00")),
                ..GrammarEntry::default()
            });
        }
        return None;
    }

    let entry = match key.as_str() {
        "vlad" => person("Vladislav Maraev"),
        "bora" => person("Bora Kara"),
        "tal" => person("Talha Bedir"),
        "tom" => person("Tom Södahl Bladsjö"),

        "monday" => day("Monday"),
        "tuesday" => day("Tuesday"),
        "wednesday" => day("Wednesday"),
        "thursday" => day("Thursday"),
        "friday" => day("Friday"),
        "saturday" => day("Saturday"),
        "sunday" => day("Sunday"),

        "yes" => polar(true),
        "no" => polar(false),

        _ => return None,
    };
    Some(entry)
}

/// Fixed-grammar strategy: the best hypothesis is matched verbatim against
/// the static table. At most one slot can resolve per utterance.
pub struct LexicalInterpreter;

impl Interpreter for LexicalInterpreter {
    fn wants_nlu(&self) -> bool {
        false
    }

    fn interpret(&self, recognition: &Recognition) -> SlotFrame {
        let Some(best) = recognition.best() else {
            return SlotFrame::default();
        };
        match lookup(&best.utterance) {
            Some(entry) => SlotFrame {
                person: entry.person,
                day: entry.day,
                time: entry.time,
                polar: entry.polar,
                intent: None,
            },
            None => SlotFrame::default(),
        }
    }
}
