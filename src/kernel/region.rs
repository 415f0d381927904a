use serde::{Deserialize, Serialize};

use super::context::{SlotKind, Slots};
use super::engine::EngineError;

/// Identity of one sub-dialogue region inside the appointment composite.
/// Every region shares the same internal shape: speak a prompt, listen,
/// branch on the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionId {
    Who,
    Day,
    WholeDay,
    Time,
    Create,
}

impl RegionId {
    pub const ALL: [RegionId; 5] = [
        RegionId::Who,
        RegionId::Day,
        RegionId::WholeDay,
        RegionId::Time,
        RegionId::Create,
    ];

    /// The slot this region exists to fill. Also decides where a polar
    /// (yes/no) answer lands.
    pub fn target(&self) -> SlotKind {
        match self {
            RegionId::Who => SlotKind::Person,
            RegionId::Day => SlotKind::Day,
            RegionId::WholeDay => SlotKind::AllDay,
            RegionId::Time => SlotKind::Time,
            RegionId::Create => SlotKind::Confirm,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RegionId::Who => "asking who",
            RegionId::Day => "asking day",
            RegionId::WholeDay => "asking whole day",
            RegionId::Time => "asking time",
            RegionId::Create => "confirming",
        }
    }
}

/// Static description of one region node in the dialogue graph.
#[derive(Debug, Clone)]
pub struct RegionSpec {
    pub id: RegionId,
}

impl RegionSpec {
    /// The region prompt. Create is the only context-templated one.
    pub fn prompt(&self, slots: &Slots) -> String {
        match self.id {
            RegionId::Who => "Who are you meeting with?".to_string(),
            RegionId::Day => "On which day is your meeting?".to_string(),
            RegionId::WholeDay => "Will it take the whole day?".to_string(),
            RegionId::Time => "What time is your meeting?".to_string(),
            RegionId::Create => {
                let person = slots.person.as_deref().unwrap_or("someone");
                let day = slots.day.as_deref().unwrap_or("some day");
                let when = match (slots.all_day, slots.time.as_deref()) {
                    (Some(true), _) => "for the whole day".to_string(),
                    (_, Some(time)) => format!("at {time}"),
                    (_, None) => "at a time to be decided".to_string(),
                };
                format!("Do you want me to create an appointment with {person} on {day} {when}?")
            }
        }
    }
}

/// The region graph, built once at engine construction. Transition
/// targets are typed (`RegionId`), so validation only has to prove the
/// table covers every routable region exactly once. A broken table is a
/// construction error, never a runtime surprise.
#[derive(Debug, Clone)]
pub struct RegionTable {
    specs: Vec<RegionSpec>,
}

impl RegionTable {
    pub fn new(specs: Vec<RegionSpec>) -> Self {
        Self { specs }
    }

    /// The full appointment graph: one node per routable region.
    pub fn standard() -> Self {
        Self::new(RegionId::ALL.iter().map(|id| RegionSpec { id: *id }).collect())
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for id in RegionId::ALL {
            match self.specs.iter().filter(|s| s.id == id).count() {
                1 => {}
                0 => {
                    return Err(EngineError::RegionTable(format!("missing region {id:?}")));
                }
                n => {
                    return Err(EngineError::RegionTable(format!(
                        "region {id:?} defined {n} times"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn spec(&self, id: RegionId) -> Option<&RegionSpec> {
        self.specs.iter().find(|s| s.id == id)
    }
}
