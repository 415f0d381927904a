use super::context::Slots;
use super::region::RegionId;

/// The slot-filling plan, evaluated on every reentry into the appointment
/// composite. Pure and idempotent: the same slot state always yields the
/// same target region.
///
/// Priority is fixed. A slot already filled by an earlier turn is skipped,
/// which is what lets one utterance carry several answers and shortens the
/// dialogue. The time question only exists for meetings that do not take
/// the whole day.
pub fn route(slots: &Slots) -> RegionId {
    if slots.person.is_none() {
        return RegionId::Who;
    }
    if slots.day.is_none() {
        return RegionId::Day;
    }
    if slots.all_day.is_none() {
        return RegionId::WholeDay;
    }
    if slots.all_day == Some(false) && slots.time.is_none() {
        return RegionId::Time;
    }
    RegionId::Create
}
