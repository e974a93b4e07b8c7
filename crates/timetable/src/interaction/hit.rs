use super::SlotHit;
use crate::model::Roster;

/// Finds the slot occupying `hour` on `day` by scanning every subject.
///
/// The first match in roster order wins when slots overlap.
pub fn find_slot(roster: &Roster, day: u8, hour: u8) -> Option<SlotHit> {
    roster
        .subjects()
        .iter()
        .enumerate()
        .find_map(|(subject_index, subject)| {
            subject.slot_at(day, hour).map(|schedule_index| SlotHit {
                subject_index,
                schedule_index,
                subject_code: subject.code.clone(),
            })
        })
}
