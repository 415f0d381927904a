use serde::{Deserialize, Serialize};

use super::event::Recognition;
use super::region::RegionId;
use crate::interpret::{Interpretation, SlotFrame};

/// A named piece of information the dialogue collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Person,
    Day,
    AllDay,
    Time,
    Confirm,
}

/// The collected slot values. `None` means "not yet answered".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slots {
    pub person: Option<String>,
    pub day: Option<String>,
    pub time: Option<String>,
    pub all_day: Option<bool>,
    pub confirmed: Option<bool>,
}

impl Slots {
    /// Merge one extracted frame. First answer wins: a slot that already
    /// holds a value is never overwritten by a later turn. Where the polar
    /// (yes/no) component lands depends on which slot the asking region
    /// targets; a turn with no polar target drops it.
    ///
    /// A time with no all-day answer forces `all_day` to false, so the
    /// whole-day question is skipped. Deliberate shortcut to save a turn.
    pub fn merge(&mut self, frame: &SlotFrame, target: Option<SlotKind>) {
        if self.person.is_none() {
            self.person = frame.person.clone();
        }
        if self.day.is_none() {
            self.day = frame.day.clone();
        }
        if self.time.is_none() {
            self.time = frame.time.clone();
        }
        match target {
            Some(SlotKind::AllDay) if self.all_day.is_none() => {
                self.all_day = frame.polar;
            }
            Some(SlotKind::Confirm) if self.confirmed.is_none() => {
                self.confirmed = frame.polar;
            }
            _ => {}
        }
        if self.time.is_some() && self.all_day.is_none() {
            self.all_day = Some(false);
        }
    }

    pub fn is_filled(&self, kind: SlotKind) -> bool {
        match kind {
            SlotKind::Person => self.person.is_some(),
            SlotKind::Day => self.day.is_some(),
            SlotKind::AllDay => self.all_day.is_some(),
            SlotKind::Time => self.time.is_some(),
            SlotKind::Confirm => self.confirmed.is_some(),
        }
    }

    /// Bulk reset. The only way a filled slot ever loses its value.
    pub fn clear(&mut self) {
        *self = Slots::default();
    }
}

/// The single mutable record threaded through the machine. Owned by the
/// engine; the surface only ever sees read-only snapshots of it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DialogueContext {
    pub slots: Slots,
    /// Most recent raw recognition. `None` exactly after a no-input
    /// timeout, retained otherwise until the next recognition.
    pub last_recognition: Option<Recognition>,
    /// Most recent service parse. Absent under the lexical strategy.
    pub last_interpretation: Option<Interpretation>,
    /// Resumption marker: the appointment region to reenter after a
    /// recovery detour. Set on every region entry, cleared on greeting
    /// entry, read only by the two recovery handlers.
    pub resume: Option<RegionId>,
}

impl DialogueContext {
    /// Fresh-session reset, on greeting entry.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.last_recognition = None;
        self.last_interpretation = None;
        self.resume = None;
    }

    pub fn observe(&mut self, recognition: Recognition) {
        self.last_interpretation = recognition.interpretation.clone();
        self.last_recognition = Some(recognition);
    }

    /// A no-input timeout clears the recognition record and nothing else.
    pub fn observe_silence(&mut self) {
        self.last_recognition = None;
    }

    pub fn best_utterance(&self) -> &str {
        self.last_recognition
            .as_ref()
            .and_then(|r| r.best())
            .map(|h| h.utterance.as_str())
            .unwrap_or_default()
    }
}
