//! Settling a street: who put in what, what is dead, and how it splits into pots.

pub mod build;
pub mod dead;
pub mod gather;

pub use build::{build_pots, Pot, PotPlayer, PotResult};
pub use dead::{calculate_dead_money, DeadMoney};
pub use gather::{gather_contributions, PlayerContribution};

use crate::action::PlayerData;
use crate::ledger::Ledger;
use crate::log::{Log, LogItem};
use crate::player::Player;
use crate::segment::Segment;
use crate::unit::Unit;
use crate::Currency;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingRoundStatus {
    pub complete: bool,
    pub reason: String,
    /// Names of the players the round is still waiting on
    pub pending_players: Vec<String>,
}

impl BettingRoundStatus {
    fn done(reason: &str) -> Self {
        Self {
            complete: true,
            reason: reason.to_string(),
            pending_players: vec![],
        }
    }
}

/// A coarser completion check than `round::check_complete`, from gathered totals alone.
pub fn betting_round_status(gathered: &[PlayerContribution]) -> BettingRoundStatus {
    let active: Vec<&PlayerContribution> = gathered.iter().filter(|c| !c.is_folded).collect();
    match active.len() {
        0 => return BettingRoundStatus::done("All players folded"),
        1 => return BettingRoundStatus::done("Only one player remaining"),
        _ => {}
    }
    let live: Vec<&PlayerContribution> = active.into_iter().filter(|c| !c.is_all_in).collect();
    let Some(max) = live.iter().map(|c| c.total_contributed).max() else {
        return BettingRoundStatus::done("All remaining players are all-in");
    };
    let behind: Vec<String> = live
        .iter()
        .filter(|c| c.total_contributed < max)
        .map(|c| c.name.clone())
        .collect();
    if behind.is_empty() {
        BettingRoundStatus::done("All active players have matched bets")
    } else {
        BettingRoundStatus {
            complete: false,
            reason: "Action pending from some players".to_string(),
            pending_players: behind,
        }
    }
}

/// Gathers, works out dead money and builds the pots for a street up to `segment`. Every level
/// of the street so far is gathered; `previous_street_pot` only holds earlier streets.
pub fn calculate_pots(
    segment: Segment,
    players: &[Player],
    player_data: &PlayerData,
    ledger: &Ledger,
    previous_street_pot: Currency,
    default_unit: Unit,
    log: &mut Log,
) -> PotResult {
    let gathered = gather_contributions(segment, players, player_data, ledger, false);
    let dead = calculate_dead_money(segment.stage, &gathered);
    if dead.total > 0 {
        log.push(LogItem::DeadMoney(dead.total));
    }
    let result = build_pots(
        &gathered,
        dead,
        previous_street_pot,
        segment,
        player_data,
        default_unit,
    );
    log.push(LogItem::PotsBuilt(
        result.total_pot,
        1 + result.side_pots.len(),
    ));
    result
}
