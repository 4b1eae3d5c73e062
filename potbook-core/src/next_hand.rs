//! Paying out the pots and seating the next hand.
use crate::action::{record_of, PlayerData};
use crate::ledger::{Chips, Ledger};
use crate::log::{Log, LogItem};
use crate::player::{self, Player};
use crate::position::{self, Position};
use crate::pot::PotResult;
use crate::segment::Stage;
use crate::validate::Validation;
use crate::{Currency, EngineError};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stacks keyed by player name.
pub type Stacks = BTreeMap<String, Currency>;

/// A pot as the showdown sees it: who can win it and how much is in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotSummary {
    pub name: String,
    /// "main", "side1", "side2", ...
    pub pot_type: String,
    pub amount: Currency,
    pub eligible: Vec<String>,
}

impl PotSummary {
    pub fn from_result(result: &PotResult) -> Vec<Self> {
        result
            .pots()
            .map(|pot| {
                let (name, pot_type) = match pot.pot_number {
                    0 => ("Main Pot".to_string(), "main".to_string()),
                    n => (format!("Side Pot {n}"), format!("side{n}")),
                };
                Self {
                    name,
                    pot_type,
                    amount: pot.amount,
                    eligible: pot.eligible_players.iter().map(|p| p.name.clone()).collect(),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerSelection {
    pub pot_name: String,
    pub pot_type: String,
    pub winner_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextHandPlayer {
    pub name: String,
    pub position: Position,
    pub stack: Currency,
    pub previous_stack: Currency,
    pub net_change: Currency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showdown {
    pub next_hand: Vec<NextHandPlayer>,
    pub validation: Validation,
    pub new_stacks: Stacks,
}

/// Everything each player put in over the hand: blinds and ante as far as the stack covered
/// them, plus every segment's chips.
pub fn hand_contributions(
    players: &[Player],
    player_data: &PlayerData,
    ledger: &Ledger,
) -> Chips {
    player::seated(players)
        .map(|p| {
            let record = record_of(player_data, p.id);
            let (sb, bb, ante) = record.posts_covered(p.stack);
            let total = sb + bb + ante + ledger.hand_total(Stage::River, p.id);
            (p.id, total)
        })
        .collect()
}

/// Stack going into the next hand for every seated player.
///
/// Each player starts from what they came in with less what they put in. Each pot is then split
/// evenly among its named winners; chips that don't divide go one apiece to winners in the order
/// they were named. A selection naming an unknown pot, nobody, or somebody not eligible pays
/// nothing. `validate_winner_selections` reports those.
pub fn new_stacks(
    players: &[Player],
    contributions: &Chips,
    winner_selections: &[WinnerSelection],
    pots: &[PotSummary],
) -> Stacks {
    let mut stacks: Stacks = player::seated(players)
        .map(|p| {
            let put_in = contributions.get(&p.id).copied().unwrap_or_default();
            (p.name.clone(), p.stack - put_in)
        })
        .collect();
    for selection in winner_selections {
        let Some(pot) = pots.iter().find(|p| p.name == selection.pot_name) else {
            continue;
        };
        let winners = &selection.winner_names;
        if winners.is_empty() || winners.iter().any(|w| !pot.eligible.contains(w)) {
            continue;
        }
        let share = pot.amount / winners.len() as Currency;
        let odd = (pot.amount % winners.len() as Currency) as usize;
        for (i, winner) in winners.iter().enumerate() {
            if let Some(stack) = stacks.get_mut(winner) {
                *stack += share + Currency::from(i < odd);
            }
        }
    }
    stacks
}

fn dealer_index(players: &[&Player]) -> Option<usize> {
    let heads_up = players.len() == 2;
    players.iter().position(|p| {
        p.position == Some(Position::Dealer) || (heads_up && p.position == Some(Position::SB))
    })
}

/// Moves the button one seat and deals everyone their new stack.
///
/// The player after the current dealer gets the first seat of the table for this many players,
/// and so on around. A dealer who started this hand with no chips is out when at least three
/// were dealt in: at three handed the old big blind takes the button (posting the small blind)
/// and the old small blind takes the big blind; at four or more the remaining players are seated
/// fresh, still starting from the old small blind.
pub fn generate_next_hand(
    players: &[Player],
    new_stacks: &Stacks,
    log: &mut Log,
) -> Result<Vec<NextHandPlayer>, EngineError> {
    let seated: Vec<&Player> = player::seated(players).collect();
    let count = seated.len();
    let seats = position::table_positions(count)?;
    let dealer_idx = dealer_index(&seated).ok_or(EngineError::DealerNotFound)?;
    let dealer = seated[dealer_idx];

    let deal = |p: &Player, position: Position| {
        let stack = new_stacks.get(&p.name).copied().unwrap_or(p.stack);
        NextHandPlayer {
            name: p.name.clone(),
            position,
            stack,
            previous_stack: p.stack,
            net_change: stack - p.stack,
        }
    };
    let rotated: Vec<&Player> = player::iter_after(&seated, dealer_idx).copied().collect();

    if dealer.stack != 0 || count < 3 {
        log.push(LogItem::SeatsAssigned(count));
        return Ok(rotated
            .into_iter()
            .zip(seats.iter())
            .map(|(p, pos)| deal(p, *pos))
            .collect());
    }

    log.push(LogItem::Eliminated(dealer.name.clone()));
    let remaining: Vec<&Player> = rotated.into_iter().filter(|p| p.id != dealer.id).collect();
    let next = if count == 3 {
        let old = |pos: Position| remaining.iter().find(|p| p.position == Some(pos));
        match (old(Position::BB), old(Position::SB)) {
            (Some(bb), Some(sb)) => vec![deal(*bb, Position::SB), deal(*sb, Position::BB)],
            _ => remaining
                .iter()
                .zip(position::table_positions(2)?.iter())
                .map(|(p, pos)| deal(*p, *pos))
                .collect(),
        }
    } else {
        remaining
            .iter()
            .zip(position::table_positions(remaining.len())?.iter())
            .map(|(p, pos)| deal(*p, *pos))
            .collect()
    };
    log.push(LogItem::SeatsAssigned(next.len()));
    Ok(next)
}

pub fn validate_winner_selections(
    pots: &[PotSummary],
    winner_selections: &[WinnerSelection],
) -> Validation {
    let mut errors = vec![];
    for pot in pots {
        match winner_selections.iter().find(|s| s.pot_name == pot.name) {
            None => errors.push(format!("No winner selected for {}", pot.name)),
            Some(s) if s.winner_names.is_empty() => {
                errors.push(format!("No winners selected for {}", pot.name))
            }
            Some(s) => {
                let ineligible: Vec<&String> = s
                    .winner_names
                    .iter()
                    .filter(|w| !pot.eligible.contains(w))
                    .collect();
                if !ineligible.is_empty() {
                    errors.push(format!(
                        "Ineligible winners for {}: {}. Eligible: {}",
                        pot.name,
                        ineligible.iter().join(", "),
                        pot.eligible.join(", ")
                    ));
                }
            }
        }
    }
    Validation::from_errors(errors)
}

/// The old small blind must have the button, or heads up the old big blind must have the small
/// blind and the old small blind the big blind. Checked even when a busted dealer changed the
/// player count: three handed that is the heads-up swap, and a bigger table is reseated from
/// the old small blind.
pub fn validate_button_rotation(current: &[Player], next: &[NextHandPlayer]) -> Validation {
    let mut errors = vec![];
    let was = |pos| player::by_position(current, pos);
    let now = |pos: Position| next.iter().find(|p| p.position == pos);
    if next.len() == 2 {
        match (now(Position::SB), now(Position::BB)) {
            (Some(sb), Some(bb)) => {
                if let Some(prev_bb) = was(Position::BB).filter(|p| p.name != sb.name) {
                    errors.push(format!(
                        "Button rotation wrong: {} (prev BB) should be new SB, got {}",
                        prev_bb.name, sb.name
                    ));
                }
                if let Some(prev_sb) = was(Position::SB).filter(|p| p.name != bb.name) {
                    errors.push(format!(
                        "Button rotation wrong: {} (prev SB) should be new BB, got {}",
                        prev_sb.name, bb.name
                    ));
                }
            }
            _ => errors.push("SB or BB not found in next hand".to_string()),
        }
    } else {
        match now(Position::Dealer) {
            None => errors.push("No dealer found in next hand".to_string()),
            Some(dealer) => {
                if let Some(prev_sb) = was(Position::SB).filter(|p| p.name != dealer.name) {
                    errors.push(format!(
                        "Button rotation wrong: {} (prev SB) should be Dealer, got {}",
                        prev_sb.name, dealer.name
                    ));
                }
            }
        }
    }
    Validation::from_errors(errors)
}

/// Everyone dealt in this hand is dealt in the next, except a dealer who started with nothing.
pub fn validate_player_set(current: &[Player], next: &[NextHandPlayer]) -> Validation {
    let seated: Vec<&Player> = player::seated(current).collect();
    let missing: Vec<&str> = seated
        .iter()
        .filter(|p| !next.iter().any(|n| n.name == p.name))
        .map(|p| p.name.as_str())
        .collect();
    let extra: Vec<&str> = next
        .iter()
        .filter(|n| !seated.iter().any(|p| p.name == n.name))
        .map(|n| n.name.as_str())
        .collect();
    if missing.is_empty() && extra.is_empty() {
        return Validation::ok();
    }
    let busted_dealer = dealer_index(&seated)
        .map(|i| seated[i])
        .filter(|d| d.stack == 0);
    if let Some(dealer) = busted_dealer {
        if extra.is_empty() && missing == [dealer.name.as_str()] {
            return Validation::ok();
        }
    }
    let mut errors = vec![];
    if seated.len() != next.len() {
        errors.push(format!(
            "Player count mismatch: {} current, {} next",
            seated.len(),
            next.len()
        ));
    }
    errors.push(format!(
        "Players mismatch. Missing: {}, Extra: {}",
        missing.join(", "),
        extra.join(", ")
    ));
    Validation::from_errors(errors)
}

pub fn validate_stacks(next: &[NextHandPlayer]) -> Validation {
    Validation::from_errors(
        next.iter()
            .filter(|p| p.stack < 0)
            .map(|p| format!("{} has negative stack: {}", p.name, p.stack))
            .collect(),
    )
}

pub fn validate_next_hand(
    current: &[Player],
    next: &[NextHandPlayer],
    pots: &[PotSummary],
    winner_selections: &[WinnerSelection],
) -> Validation {
    let mut v = validate_winner_selections(pots, winner_selections);
    v.merge(validate_button_rotation(current, next));
    v.merge(validate_player_set(current, next));
    v.merge(validate_stacks(next));
    v
}

/// Pays out the pots, seats the next hand and checks the result.
pub fn process_showdown(
    players: &[Player],
    player_data: &PlayerData,
    ledger: &Ledger,
    pots: &[PotSummary],
    winner_selections: &[WinnerSelection],
    log: &mut Log,
) -> Result<Showdown, EngineError> {
    let contributions = hand_contributions(players, player_data, ledger);
    let new_stacks = new_stacks(players, &contributions, winner_selections, pots);
    let next_hand = generate_next_hand(players, &new_stacks, log)?;
    let validation = validate_next_hand(players, &next_hand, pots, winner_selections);
    Ok(Showdown {
        next_hand,
        validation,
        new_stacks,
    })
}
