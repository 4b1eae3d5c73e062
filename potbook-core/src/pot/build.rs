use super::dead::DeadMoney;
use super::gather::PlayerContribution;
use super::{betting_round_status, BettingRoundStatus};
use crate::action::{self, record_of, PlayerData, PreviousRound};
use crate::position::{self, Position};
use crate::segment::Segment;
use crate::unit::Unit;
use crate::{Currency, PlayerId};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub const BELOW_LEVEL: &str = "Below contribution level";

/// A player as listed against one pot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotPlayer {
    pub id: PlayerId,
    pub name: String,
    #[serde(default, with = "position::label")]
    pub position: Option<Position>,
    /// Chips this player has in this pot
    pub contribution: Currency,
    /// Chips this player has in on the street
    pub total_contribution: Currency,
    pub is_all_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_round: Option<PreviousRound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    /// 0 for the main pot, then 1, 2, ... for side pots
    pub pot_number: usize,
    pub amount: Currency,
    pub capped_at: Currency,
    pub eligible_players: Vec<PotPlayer>,
    pub excluded_players: Vec<PotPlayer>,
    /// Share of the total, rounded to a whole percent
    pub percentage: u32,
}

impl Pot {
    pub fn is_eligible(&self, name: &str) -> bool {
        self.eligible_players.iter().any(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotResult {
    pub main_pot: Pot,
    /// Strictly increasing `capped_at`
    pub side_pots: Vec<Pot>,
    pub total_pot: Currency,
    pub dead_money: Currency,
    pub dead_money_breakdown: DeadMoney,
    pub has_zero_contributor: bool,
    pub zero_contributors: Vec<PotPlayer>,
    pub betting_round_status: BettingRoundStatus,
}

impl PotResult {
    /// Main pot first, then side pots in order.
    pub fn pots(&self) -> impl Iterator<Item = &Pot> + '_ {
        std::iter::once(&self.main_pot).chain(self.side_pots.iter())
    }
}

fn pot_player(
    c: &PlayerContribution,
    in_pot: Currency,
    segment: Segment,
    player_data: &PlayerData,
    default_unit: Unit,
) -> PotPlayer {
    PotPlayer {
        id: c.player_id,
        name: c.name.clone(),
        position: c.position,
        contribution: in_pot,
        total_contribution: c.total_contributed,
        is_all_in: c.is_all_in,
        previous_round: action::previous_round(
            &record_of(player_data, c.player_id),
            segment,
            default_unit,
        ),
        reason: None,
    }
}

fn percentage(amount: Currency, total: Currency) -> u32 {
    if total <= 0 {
        return 0;
    }
    (amount as f64 / total as f64 * 100.0).round() as u32
}

/// Splits a street's contributions into a main pot and side pots.
///
/// Without an all-in everything goes in one pot. Otherwise there is one pot per distinct
/// contribution level among the players still in; a pot holds what each player put in
/// between the level below it and its own. Dead money and whatever was carried over from
/// earlier go in the main pot.
pub fn build_pots(
    gathered: &[PlayerContribution],
    dead: DeadMoney,
    previous_street_pot: Currency,
    segment: Segment,
    player_data: &PlayerData,
    default_unit: Unit,
) -> PotResult {
    let status = betting_round_status(gathered);
    let active: Vec<&PlayerContribution> = gathered.iter().filter(|c| !c.is_folded).collect();
    let contributed: Currency = active.iter().map(|c| c.total_contributed).sum();
    let total_pot = contributed + dead.total + previous_street_pot;
    let listed = |c: &PlayerContribution, in_pot| {
        pot_player(c, in_pot, segment, player_data, default_unit)
    };

    let mut pots = if active.is_empty() {
        vec![Pot {
            pot_number: 0,
            amount: 0,
            capped_at: 0,
            eligible_players: vec![],
            excluded_players: vec![],
            percentage: 0,
        }]
    } else if !active.iter().any(|c| c.is_all_in) {
        vec![Pot {
            pot_number: 0,
            amount: contributed,
            capped_at: active
                .iter()
                .map(|c| c.total_contributed)
                .max()
                .unwrap_or_default(),
            eligible_players: active
                .iter()
                .map(|c| listed(*c, c.total_contributed))
                .collect(),
            excluded_players: vec![],
            percentage: 0,
        }]
    } else {
        let levels = active
            .iter()
            .map(|c| c.total_contributed)
            .sorted()
            .dedup();
        let mut floor = 0;
        let mut pots = Vec::new();
        for cap in levels {
            let per_player = cap - floor;
            let (eligible, below): (Vec<&PlayerContribution>, Vec<&PlayerContribution>) =
                active.iter().copied().partition(|c| c.total_contributed >= cap);
            pots.push(Pot {
                pot_number: pots.len(),
                amount: per_player * eligible.len() as Currency,
                capped_at: cap,
                eligible_players: eligible
                    .into_iter()
                    .map(|c| listed(c, per_player))
                    .collect(),
                excluded_players: below
                    .into_iter()
                    .map(|c| PotPlayer {
                        reason: Some(BELOW_LEVEL.to_string()),
                        ..listed(c, 0)
                    })
                    .collect(),
                percentage: 0,
            });
            floor = cap;
        }
        pots
    };

    pots[0].amount += dead.total + previous_street_pot;
    if active.is_empty() {
        pots[0].percentage = 100;
    } else {
        for pot in pots.iter_mut() {
            pot.percentage = percentage(pot.amount, total_pot);
        }
    }

    let zero_contributors: Vec<PotPlayer> = active
        .iter()
        .filter(|c| c.total_contributed == 0)
        .map(|c| listed(*c, 0))
        .collect();
    let main_pot = pots.remove(0);
    PotResult {
        main_pot,
        side_pots: pots,
        total_pot,
        dead_money: dead.total,
        dead_money_breakdown: dead,
        has_zero_contributor: !zero_contributors.is_empty(),
        zero_contributors,
        betting_round_status: status,
    }
}
