//! Whether a betting round is finished, and if not, who it is waiting on.

use crate::action::{record_of, Action, ActionEntry, PlayerData, PlayerRecord};
use crate::player::{self, Player};
use crate::segment::{Level, Segment};
use crate::{Currency, PlayerId};
use serde::{Deserialize, Serialize};
use std::iter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundCompletion {
    pub is_complete: bool,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending_players: Vec<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_contribution: Option<Currency>,
}

impl RoundCompletion {
    fn complete(reason: &str, max_contribution: Option<Currency>) -> Self {
        Self {
            is_complete: true,
            reason: reason.to_string(),
            pending_players: vec![],
            max_contribution,
        }
    }

    fn waiting(reason: &str, pending: Vec<PlayerId>, max_contribution: Option<Currency>) -> Self {
        Self {
            is_complete: false,
            reason: reason.to_string(),
            pending_players: pending,
            max_contribution,
        }
    }
}

/// One active player as the round sees them.
struct Standing {
    id: PlayerId,
    /// Street total in chips, read from the recorded amounts
    contribution: Currency,
    /// What they did at this level, if anything
    action: Option<Action>,
    all_in: bool,
}

/// `segment` and the levels before it on the same street, most recent first.
fn this_and_earlier_levels(segment: Segment) -> impl Iterator<Item = Segment> {
    iter::successors(Some(segment), |s| {
        s.level.previous().map(|l| Segment::new(s.stage, l))
    })
}

fn preflop_standing(segment: Segment, p: &Player, record: &PlayerRecord) -> Standing {
    let contribution = this_and_earlier_levels(segment)
        .filter_map(|s| record.entry(s))
        .map(ActionEntry::chips_guessing_unit)
        .find(|c| *c > 0)
        .unwrap_or_else(|| {
            let (sb, bb, _) = record.posts_covered(p.stack);
            sb + bb
        });
    Standing {
        id: p.id,
        contribution,
        action: record.entry(segment).and_then(ActionEntry::taken),
        all_in: record.all_in_through(segment),
    }
}

fn postflop_standing(segment: Segment, id: PlayerId, record: &PlayerRecord) -> Standing {
    let contribution = this_and_earlier_levels(segment)
        .filter_map(|s| record.entry(s))
        .filter(|e| e.action.map_or(false, |a| a.is_wager()))
        .map(ActionEntry::chips_guessing_unit)
        .find(|c| *c > 0)
        .unwrap_or_default();
    let action = match segment.level {
        Level::Base => record.entry(segment).and_then(ActionEntry::taken),
        // Only chips-moving actions count as having acted again
        Level::More | Level::More2 => record.action(segment).filter(Action::is_wager),
    };
    Standing {
        id,
        contribution,
        action,
        all_in: record.all_in_through(segment),
    }
}

/// Decides whether betting in `segment` is over.
///
/// Recorded amounts are street totals, as the engine writes them back. Preflop, a player who
/// has not acted is in for their blinds. Postflop, a round nobody has bet in only ends once
/// everyone has checked or is all in.
pub fn check_complete(
    segment: Segment,
    players: &[Player],
    player_data: &PlayerData,
) -> RoundCompletion {
    let standings: Vec<Standing> = player::seated(players)
        .filter_map(|p| {
            let record = record_of(player_data, p.id);
            if record.folded_through(segment) {
                return None;
            }
            Some(if segment.stage.is_preflop() {
                preflop_standing(segment, p, &record)
            } else {
                postflop_standing(segment, p.id, &record)
            })
        })
        .collect();
    match standings.len() {
        0 => return RoundCompletion::complete("No active players", None),
        1 => return RoundCompletion::complete("Only one active player", None),
        _ => {}
    }

    let max = standings
        .iter()
        .map(|s| s.contribution)
        .max()
        .unwrap_or_default();

    if !segment.stage.is_preflop() && max == 0 {
        if standings
            .iter()
            .all(|s| s.action == Some(Action::Check) || s.all_in)
        {
            return RoundCompletion::complete("All players checked or all-in", Some(0));
        }
        let pending = standings
            .iter()
            .filter(|s| s.action.is_none() && !s.all_in)
            .map(|s| s.id)
            .collect();
        return RoundCompletion::waiting("Players pending action (check required)", pending, None);
    }

    let pending: Vec<PlayerId> = standings
        .iter()
        .filter(|s| s.action.is_none() && !s.all_in && s.contribution < max)
        .map(|s| s.id)
        .collect();
    if !pending.is_empty() {
        return RoundCompletion::waiting("Players pending action", pending, None);
    }

    let behind: Vec<PlayerId> = standings
        .iter()
        .filter(|s| !s.all_in && s.contribution < max)
        .map(|s| s.id)
        .collect();
    if !behind.is_empty() {
        return RoundCompletion::waiting("Contributions not matched", behind, Some(max));
    }

    RoundCompletion::complete("All players acted and contributions matched", Some(max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::process_cascade;
    use crate::fixtures::*;
    use crate::unit::Unit;

    fn settled(target: Segment, players: &[Player], data: &PlayerData) -> PlayerData {
        process_cascade(target, players, data, Unit::K).player_data
    }

    #[test]
    fn limped_preflop_is_complete() {
        let (players, mut data) = three_handed();
        act(&mut data, 1, PF, Action::Call);
        act(&mut data, 2, PF, Action::Call);
        act(&mut data, 3, PF, Action::Check);
        let data = settled(PF, &players, &data);
        let c = check_complete(PF, &players, &data);
        assert!(c.is_complete);
        assert_eq!(c.reason, "All players acted and contributions matched");
        assert_eq!(c.max_contribution, Some(1000));
    }

    #[test]
    fn raise_leaves_blinds_pending() {
        let (players, mut data) = three_handed();
        act_to(&mut data, 1, PF, Action::Raise, 3000);
        let c = check_complete(PF, &players, &data);
        assert!(!c.is_complete);
        assert_eq!(c.reason, "Players pending action");
        assert_eq!(c.pending_players, vec![2, 3]);
    }

    #[test]
    fn short_caller_is_not_waited_on() {
        let (players, mut data) = three_handed();
        act_to(&mut data, 1, PF, Action::Raise, 9000);
        act(&mut data, 2, PF, Action::Call);
        act(&mut data, 3, PF, Action::Call);
        let data = settled(PF, &players, &data);
        assert_eq!(data[&2].action(PF), Some(Action::AllIn));
        let c = check_complete(PF, &players, &data);
        assert!(c.is_complete);
        assert_eq!(c.max_contribution, Some(9000));
    }

    #[test]
    fn everyone_folds_to_the_raiser() {
        let (players, mut data) = three_handed();
        act_to(&mut data, 1, PF, Action::Raise, 3000);
        act(&mut data, 2, PF, Action::Fold);
        act(&mut data, 3, PF, Action::Fold);
        let c = check_complete(PF, &players, &data);
        assert!(c.is_complete);
        assert_eq!(c.reason, "Only one active player");
    }

    #[test]
    fn more_action_falls_back_to_base_amounts() {
        let (players, mut data) = three_handed();
        act(&mut data, 1, PF, Action::Call);
        act(&mut data, 2, PF, Action::Call);
        act_to(&mut data, 3, PF, Action::Raise, 4000);
        let data = settled(PF, &players, &data);
        let c = check_complete(PF_MORE, &players, &data);
        assert!(!c.is_complete);
        assert_eq!(c.pending_players, vec![1, 2]);

        let mut data = data;
        act(&mut data, 1, PF_MORE, Action::Call);
        act(&mut data, 2, PF_MORE, Action::Fold);
        let data = settled(PF_MORE, &players, &data);
        let c = check_complete(PF_MORE, &players, &data);
        assert!(c.is_complete);
        assert_eq!(c.max_contribution, Some(4000));
    }

    #[test]
    fn checked_around_flop() {
        let (players, mut data) = three_handed();
        for id in 1..=3 {
            act(&mut data, id, PF, Action::Call);
        }
        act(&mut data, 2, FLOP, Action::Check);
        act(&mut data, 3, FLOP, Action::Check);
        let data = settled(FLOP, &players, &data);
        let c = check_complete(FLOP, &players, &data);
        assert!(!c.is_complete);
        assert_eq!(c.reason, "Players pending action (check required)");
        assert_eq!(c.pending_players, vec![1]);

        let mut data = data;
        act(&mut data, 1, FLOP, Action::Check);
        let c = check_complete(FLOP, &players, &data);
        assert!(c.is_complete);
        assert_eq!(c.reason, "All players checked or all-in");
        assert_eq!(c.max_contribution, Some(0));
    }

    #[test]
    fn check_behind_a_bet_is_unmatched() {
        let (players, mut data) = three_handed();
        for id in 1..=3 {
            act(&mut data, id, PF, Action::Call);
        }
        act_to(&mut data, 2, FLOP, Action::Bet, 2000);
        act(&mut data, 3, FLOP, Action::Call);
        act(&mut data, 1, FLOP, Action::Check);
        let data = settled(FLOP, &players, &data);
        let c = check_complete(FLOP, &players, &data);
        assert!(!c.is_complete);
        assert_eq!(c.reason, "Contributions not matched");
        assert_eq!(c.pending_players, vec![1]);
        assert_eq!(c.max_contribution, Some(2000));
    }

    #[test]
    fn call_without_an_amount_keeps_the_earlier_bet() {
        let (players, mut data) = three_handed();
        for id in 1..=3 {
            act(&mut data, id, PF, Action::Call);
        }
        act_to(&mut data, 2, FLOP, Action::Bet, 2000);
        act_to(&mut data, 3, FLOP, Action::Raise, 6000);
        act(&mut data, 1, FLOP, Action::Call);
        let mut data = settled(FLOP, &players, &data);
        act(&mut data, 2, FLOP_MORE, Action::Fold);
        act(&mut data, 3, FLOP_MORE, Action::Call);
        let c = check_complete(FLOP_MORE, &players, &data);
        assert!(c.is_complete);
        assert_eq!(c.reason, "All players acted and contributions matched");
        assert_eq!(c.max_contribution, Some(6000));
    }
}
