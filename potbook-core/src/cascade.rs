//! Runs the engine over every segment of a hand up to a target.

use crate::action::PlayerData;
use crate::engine::{self, AllInEvent};
use crate::ledger::Ledger;
use crate::log::{Log, LogItem};
use crate::player::{self, Player};
use crate::segment::Segment;
use crate::unit::Unit;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeResult {
    pub player_data: PlayerData,
    pub ledger: Ledger,
    /// Every all-in found on the way, tagged with the segment it happened in
    pub all_ins: Vec<AllInEvent>,
    pub log: Log,
}

/// Whether anybody at the table has something recorded in `segment`.
pub fn has_actions(segment: Segment, players: &[Player], player_data: &PlayerData) -> bool {
    player::seated(players).any(|p| {
        player_data
            .get(&p.id)
            .and_then(|r| r.action(segment))
            .is_some()
    })
}

/// Computes every segment from preflop base through `target` from scratch.
///
/// Preflop base is always computed; later segments only when somebody acted in them.
pub fn process_cascade(
    target: Segment,
    players: &[Player],
    player_data: &PlayerData,
    default_unit: Unit,
) -> CascadeResult {
    resume_cascade(target, players, player_data, Ledger::default(), default_unit)
}

/// Like `process_cascade`, but keeps whatever `ledger` already has marked as processed.
pub fn resume_cascade(
    target: Segment,
    players: &[Player],
    player_data: &PlayerData,
    mut ledger: Ledger,
    default_unit: Unit,
) -> CascadeResult {
    let mut data = player_data.clone();
    let mut all_ins = Vec::new();
    let mut log = Log::default();
    for segment in target.up_to() {
        if ledger.processed.is_processed(segment) {
            continue;
        }
        if !segment.is_preflop_base() && !has_actions(segment, players, &data) {
            log.push(LogItem::SegmentSkipped(segment));
            continue;
        }
        let outcome = engine::process_segment(segment, players, &data, &ledger, default_unit);
        data = outcome.player_data;
        ledger.commit(segment, outcome.stacks, outcome.contributed);
        all_ins.extend(outcome.all_ins);
        log.extend(outcome.log);
    }
    CascadeResult {
        player_data: data,
        ledger,
        all_ins,
        log,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::fixtures::*;
    use crate::ledger::ProcessedSections;

    fn raised_then_bet() -> (Vec<Player>, PlayerData) {
        let (players, mut data) = three_handed();
        act_to(&mut data, 1, PF, Action::Raise, 3000);
        act(&mut data, 2, PF, Action::Call);
        act(&mut data, 3, PF, Action::Call);
        act_to(&mut data, 2, FLOP, Action::Bet, 2000);
        act(&mut data, 3, FLOP, Action::Fold);
        act(&mut data, 1, FLOP, Action::Call);
        (players, data)
    }

    #[test]
    fn threads_stacks_across_streets() {
        let (players, data) = raised_then_bet();
        let r = process_cascade(FLOP, &players, &data, Unit::K);
        assert_eq!(r.ledger.contribution(PF, 1), 3000);
        assert_eq!(r.ledger.contribution(PF, 2), 2500);
        assert_eq!(r.ledger.contribution(PF, 3), 2000);
        assert_eq!(r.ledger.contribution(FLOP, 2), 2000);
        assert_eq!(r.ledger.contribution(FLOP, 3), 0);
        assert_eq!(r.ledger.contribution(FLOP, 1), 2000);
        assert_eq!(r.ledger.updated_stack(FLOP, 1), Some(5000));
        assert_eq!(r.ledger.updated_stack(FLOP, 2), Some(3500));
        assert_eq!(r.ledger.updated_stack(FLOP, 3), Some(9000));
        assert_eq!(
            r.ledger.processed,
            ProcessedSections::PREFLOP_BASE | ProcessedSections::FLOP_BASE
        );
        assert!(r
            .log
            .items()
            .any(|i| *i == LogItem::SegmentSkipped(PF_MORE)));
        assert!(r.all_ins.is_empty());
    }

    #[test]
    fn same_input_same_output() {
        let (players, data) = raised_then_bet();
        let a = process_cascade(FLOP, &players, &data, Unit::K);
        let b = process_cascade(FLOP, &players, &data, Unit::K);
        assert_eq!(a.ledger, b.ledger);
        assert_eq!(a.player_data, b.player_data);
        assert_eq!(
            serde_json::to_string(&a.ledger).unwrap(),
            serde_json::to_string(&b.ledger).unwrap()
        );
    }

    #[test]
    fn resume_skips_processed_segments() {
        let (players, data) = raised_then_bet();
        let full = process_cascade(FLOP, &players, &data, Unit::K);

        let again = resume_cascade(FLOP, &players, &full.player_data, full.ledger.clone(), Unit::K);
        assert_eq!(again.ledger, full.ledger);
        assert!(!again
            .log
            .items()
            .any(|i| matches!(i, LogItem::SegmentProcessed(..))));

        let preflop_only = process_cascade(PF, &players, &data, Unit::K);
        let resumed = resume_cascade(
            FLOP,
            &players,
            &preflop_only.player_data,
            preflop_only.ledger,
            Unit::K,
        );
        assert_eq!(resumed.ledger, full.ledger);
    }

    #[test]
    fn all_ins_are_tagged() {
        let (players, mut data) = three_handed();
        act_to(&mut data, 1, PF, Action::Raise, 9000);
        act(&mut data, 2, PF, Action::Call);
        act(&mut data, 3, PF, Action::Fold);
        let r = process_cascade(PF, &players, &data, Unit::K);
        assert_eq!(r.all_ins.len(), 1);
        assert_eq!(r.all_ins[0].player_id, 2);
        assert_eq!(r.all_ins[0].segment, PF);
        assert_eq!(r.player_data[&2].action(PF), Some(Action::AllIn));
        assert_eq!(r.ledger.contribution(PF, 2), 8000);
    }
}
