//! Choosing which dialogue set a speaker shows.

use super::data::DialogueSet;
use crate::quests::QuestLedger;

/// Pick the set to show from `sets` given the ledger and the last set shown.
///
/// Eligible sets are ordered by descending priority, ties keeping their
/// declaration order. If `last_shown` is still eligible it wins, otherwise
/// the first eligible set does.
pub fn select_dialogue_set<'a>(
    sets: &'a [DialogueSet],
    ledger: &QuestLedger,
    last_shown: Option<&str>,
) -> Option<&'a DialogueSet> {
    let mut eligible: Vec<&DialogueSet> = sets.iter().filter(|s| s.can_activate(ledger)).collect();
    // sort_by is stable
    eligible.sort_by(|a, b| b.priority.cmp(&a.priority));

    if let Some(last) = last_shown.filter(|name| !name.is_empty()) {
        if let Some(set) = eligible.iter().find(|s| s.name == last) {
            return Some(set);
        }
    }
    eligible.first().copied()
}
