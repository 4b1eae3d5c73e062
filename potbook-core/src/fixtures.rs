//! Tables shared by the unit tests.

use crate::action::{Action, PlayerData};
use crate::player::Player;
use crate::position::Position;
use crate::segment::{Level, Segment, Stage};
use crate::unit::Unit;
use crate::{Currency, PlayerId};

pub(crate) const PF: Segment = Segment::PREFLOP_BASE;
pub(crate) const PF_MORE: Segment = Segment::new(Stage::Preflop, Level::More);
pub(crate) const PF_MORE2: Segment = Segment::new(Stage::Preflop, Level::More2);
pub(crate) const FLOP: Segment = Segment::new(Stage::Flop, Level::Base);
pub(crate) const FLOP_MORE: Segment = Segment::new(Stage::Flop, Level::More);
pub(crate) const TURN: Segment = Segment::new(Stage::Turn, Level::Base);
pub(crate) const RIVER: Segment = Segment::new(Stage::River, Level::Base);

pub(crate) fn seat(id: PlayerId, name: &str, position: Position, stack: Currency) -> Player {
    Player::new(id, name, Some(position), stack)
}

pub(crate) fn post(
    data: &mut PlayerData,
    id: PlayerId,
    sb: Currency,
    bb: Currency,
    ante: Currency,
) {
    let r = data.entry(id).or_default();
    r.posted_sb = sb;
    r.posted_bb = bb;
    r.posted_ante = ante;
}

pub(crate) fn act(data: &mut PlayerData, id: PlayerId, segment: Segment, action: Action) {
    data.entry(id).or_default().record(segment, action);
}

/// Amount in actual chips.
pub(crate) fn act_to(
    data: &mut PlayerData,
    id: PlayerId,
    segment: Segment,
    action: Action,
    chips: Currency,
) {
    data.entry(id)
        .or_default()
        .record_amount(segment, action, chips as f64, Unit::Actual);
}

/// Dealer 10000 (1), SB 8500 (2), BB 12000 (3), blinds 500/1000.
pub(crate) fn three_handed() -> (Vec<Player>, PlayerData) {
    let players = vec![
        seat(1, "Alice", Position::Dealer, 10_000),
        seat(2, "Bob", Position::SB, 8_500),
        seat(3, "Carol", Position::BB, 12_000),
    ];
    let mut data = PlayerData::new();
    post(&mut data, 2, 500, 0, 0);
    post(&mut data, 3, 0, 1000, 0);
    (players, data)
}

/// UTG (1), Dealer (2), SB (3), BB (4), 20000 each, blinds 500/1000.
pub(crate) fn four_handed() -> (Vec<Player>, PlayerData) {
    let players = vec![
        seat(1, "Ann", Position::UTG, 20_000),
        seat(2, "Ben", Position::Dealer, 20_000),
        seat(3, "Cat", Position::SB, 20_000),
        seat(4, "Dan", Position::BB, 20_000),
    ];
    let mut data = PlayerData::new();
    post(&mut data, 3, 500, 0, 0);
    post(&mut data, 4, 0, 1000, 0);
    (players, data)
}
