//! Turns what players did in one segment into chips moved.

use crate::action::{record_of, Action, PlayerData, PlayerRecord};
use crate::ledger::{Chips, Ledger, SegmentStacks};
use crate::log::LogItem;
use crate::player::{self, Player};
use crate::position::{self, Position};
use crate::segment::{Level, Segment};
use crate::unit::{self, Unit};
use crate::{Currency, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllInEvent {
    pub player_id: PlayerId,
    pub name: String,
    pub segment: Segment,
    /// What the player needed to be in for on this street
    pub required: Currency,
    /// What they could be in for
    pub available: Currency,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOutcome {
    /// Input data with call amounts filled in and short wagers rewritten as all-ins
    pub player_data: PlayerData,
    pub stacks: SegmentStacks,
    /// Chips put in during this segment only
    pub contributed: Chips,
    pub all_ins: Vec<AllInEvent>,
    pub log: Vec<LogItem>,
}

/// Players still in when `segment` starts, in the order they act.
///
/// After the first level of a street, action picks up after whoever acted last in the level
/// before.
pub fn acting_order<'a>(
    segment: Segment,
    players: &'a [Player],
    player_data: &PlayerData,
) -> Vec<&'a Player> {
    let count = player::seated_count(players);
    let mut order: Vec<&Player> = player::seated(players)
        .filter(|p| !record_of(player_data, p.id).folded_before(segment))
        .collect();
    order.sort_by_key(|p| position::action_rank(p.position, count, segment.stage));
    if let Some(level) = segment.level.previous() {
        let prev = Segment::new(segment.stage, level);
        let prev_order = acting_order(prev, players, player_data);
        let last_actor = prev_order.iter().rposition(|p| {
            matches!(
                record_of(player_data, p.id).action(prev),
                Some(a) if a != Action::Fold && a != Action::NoAction
            )
        });
        if let Some(i) = last_actor {
            order = player::iter_after(&prev_order, i)
                .filter(|p| order.iter().any(|q| q.id == p.id))
                .copied()
                .collect();
        }
    }
    order
}

/// Stack going into `segment`. Preflop base starts from the hand's stack less whatever was
/// posted; later segments carry on from the last one that recorded a stack.
pub fn entering_stack(
    segment: Segment,
    player: &Player,
    record: &PlayerRecord,
    ledger: &Ledger,
) -> Currency {
    if segment.is_preflop_base() {
        return (player.stack - record.posted_total()).max(0);
    }
    ledger
        .carried_stack(segment, player.id)
        .unwrap_or(player.stack)
}

/// What the player already has in on this street before `segment`. Preflop, posted blinds
/// count as far as the stack covered them; the ante does not.
pub fn already_contributed(
    segment: Segment,
    player: &Player,
    record: &PlayerRecord,
    ledger: &Ledger,
) -> Currency {
    let blinds = if segment.stage.is_preflop() {
        let (sb, bb, _) = record.posts_covered(player.stack);
        sb + bb
    } else {
        0
    };
    blinds
        + segment
            .earlier_levels()
            .map(|s| ledger.contribution(s, player.id))
            .sum::<Currency>()
}

fn opening_bet(
    segment: Segment,
    players: &[Player],
    player_data: &PlayerData,
    already: &BTreeMap<PlayerId, Currency>,
) -> Currency {
    match segment.level {
        Level::Base if segment.stage.is_preflop() => player::by_position(players, Position::BB)
            .and_then(|bb| player_data.get(&bb.id))
            .map(|r| r.posted_bb)
            .unwrap_or_else(|| {
                player_data
                    .values()
                    .map(|r| r.posted_bb)
                    .max()
                    .unwrap_or_default()
            }),
        Level::Base => 0,
        Level::More | Level::More2 => already.values().copied().max().unwrap_or_default(),
    }
}

fn all_in_event(
    p: &Player,
    segment: Segment,
    required: Currency,
    available: Currency,
) -> AllInEvent {
    AllInEvent {
        player_id: p.id,
        name: p.name.clone(),
        segment,
        required,
        available,
    }
}

fn write_amount(
    data: &mut PlayerData,
    id: PlayerId,
    segment: Segment,
    total: Currency,
    unit: Unit,
    rewrite: Option<Action>,
) {
    let entry = data.entry(id).or_default().entry_mut(segment);
    entry.amount = Some(unit::to_display(total, unit));
    entry.unit = Some(unit);
    if rewrite.is_some() {
        entry.action = rewrite;
    }
}

/// Works out every player's contribution for one segment.
///
/// Calls are filled in at the amount to match. Calls, bets and raises the player can't cover
/// become all-ins for what they have. A bet or raise with no amount is skipped; validate
/// before calling if that matters.
pub fn process_segment(
    segment: Segment,
    players: &[Player],
    player_data: &PlayerData,
    ledger: &Ledger,
    default_unit: Unit,
) -> SegmentOutcome {
    let mut data = player_data.clone();
    let mut stacks = SegmentStacks::default();
    let mut contributed = Chips::new();
    let mut all_ins = Vec::new();
    let mut log = Vec::new();

    let mut already_in = BTreeMap::new();
    for p in player::seated(players) {
        let record = record_of(player_data, p.id);
        let current = entering_stack(segment, p, &record, ledger);
        stacks.initial.insert(p.id, p.stack);
        stacks.current.insert(p.id, current);
        stacks.updated.insert(p.id, current);
        already_in.insert(p.id, already_contributed(segment, p, &record, ledger));
    }
    let mut max_bet = opening_bet(segment, players, player_data, &already_in);

    let order = acting_order(segment, players, player_data);
    for p in order.iter() {
        let record = record_of(player_data, p.id);
        if segment.is_preflop_base() && p.stack > 0 && record.posted_total() >= p.stack {
            let r = data.entry(p.id).or_default();
            r.forced_all_in_preflop = true;
            r.forced_all_in_amount = p.stack;
            all_ins.push(all_in_event(p, segment, record.posted_total(), p.stack));
            log.push(LogItem::ForcedAllIn(
                segment,
                p.id,
                record.posted_total(),
                p.stack,
            ));
        }
    }

    for p in order {
        let current = stacks.current[&p.id];
        let already = already_in[&p.id];
        let entry = record_of(player_data, p.id)
            .entry(segment)
            .cloned()
            .unwrap_or_default();
        let unit = entry.unit.unwrap_or(default_unit);
        let put_in = match entry.action {
            Some(Action::Call) => {
                let required = (max_bet - already).max(0);
                if current >= required {
                    write_amount(&mut data, p.id, segment, max_bet, unit, None);
                    required
                } else {
                    let total = already + current;
                    write_amount(&mut data, p.id, segment, total, unit, Some(Action::AllIn));
                    all_ins.push(all_in_event(p, segment, max_bet, total));
                    log.push(LogItem::ForcedAllIn(segment, p.id, max_bet, total));
                    current
                }
            }
            Some(action @ (Action::Bet | Action::Raise)) => {
                let target = entry.chips(default_unit);
                if entry.amount.is_none() || target <= 0 {
                    log.push(LogItem::MissingAmount(segment, p.id, action));
                    0
                } else if target - already > current {
                    let total = already + current;
                    write_amount(&mut data, p.id, segment, total, unit, Some(Action::AllIn));
                    all_ins.push(all_in_event(p, segment, target, total));
                    log.push(LogItem::ForcedAllIn(segment, p.id, target, total));
                    max_bet = max_bet.max(total);
                    current
                } else {
                    max_bet = max_bet.max(target);
                    (target - already).max(0)
                }
            }
            Some(Action::AllIn) => {
                let total = already + current;
                max_bet = max_bet.max(total);
                write_amount(&mut data, p.id, segment, total, unit, None);
                all_ins.push(all_in_event(p, segment, total, total));
                log.push(LogItem::AllIn(segment, p.id, total));
                current
            }
            Some(Action::Fold | Action::Check | Action::NoAction) | None => 0,
        };
        contributed.insert(p.id, put_in);
        stacks.updated.insert(p.id, current - put_in);
    }

    log.push(LogItem::SegmentProcessed(
        segment,
        contributed.values().sum(),
    ));
    SegmentOutcome {
        player_data: data,
        stacks,
        contributed,
        all_ins,
        log,
    }
}
