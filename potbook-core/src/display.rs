//! Ready-to-render breakdowns of computed pots.

use crate::ledger::Ledger;
use crate::player::{self, Player};
use crate::pot::{Pot, PotResult};
use crate::position::Position;
use crate::segment::{Stage, ALL_STAGES};
use crate::unit::with_commas;
use crate::{Currency, PlayerId, StackData};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PotKind {
    Main,
    Side,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetContribution {
    pub street: Stage,
    pub amount: Currency,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayContribution {
    pub player_id: PlayerId,
    /// Everything the player has put in this hand so far
    pub amount: Currency,
    pub is_all_in: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedPlayer {
    pub player: Player,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculation {
    /// One line per source of chips, label padded to a column
    pub formula: String,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPot {
    pub pot_type: PotKind,
    /// Side pots count from 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pot_number: Option<usize>,
    pub amount: Currency,
    pub eligible_players: Vec<Player>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_players: Vec<ExcludedPlayer>,
    pub contributions: Vec<DisplayContribution>,
    pub street_breakdown: Vec<StreetContribution>,
    pub calculation: Calculation,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPotData {
    pub total_pot: Currency,
    pub main_pot: DisplayPot,
    pub side_pots: Vec<DisplayPot>,
    pub players: Vec<Player>,
}

fn count(n: usize, what: &str) -> String {
    if n == 1 {
        format!("1 {what}")
    } else {
        format!("{n} {what}s")
    }
}

fn dollars(v: Currency) -> String {
    format!("${}", with_commas(v))
}

fn line(label: &str, amount: Currency) -> String {
    format!("{:<25}{}", label, dollars(amount))
}

fn player_line(p: &Player, amount: Currency) -> String {
    let label = match p.position {
        Some(pos) => format!("{} ({}):", p.name, pos),
        None => format!("{}:", p.name),
    };
    line(&label, amount)
}

/// Turns a pot result into what the pot panel shows: who is in each pot, per-street totals,
/// and a line-by-line account of where the chips came from.
///
/// `blinds` adds the posted blinds to the preflop figures, which the ledger does not hold.
pub fn format_pots_for_display(
    result: &PotResult,
    players: &[Player],
    ledger: &Ledger,
    street: Stage,
    blinds: Option<&StackData>,
) -> DisplayPotData {
    let f = Formatter {
        result,
        players,
        ledger,
        street,
        blinds,
    };
    DisplayPotData {
        total_pot: result.total_pot,
        main_pot: f.pot(&result.main_pot, PotKind::Main),
        side_pots: result
            .side_pots
            .iter()
            .map(|p| f.pot(p, PotKind::Side))
            .collect(),
        players: player::seated(players).cloned().collect(),
    }
}

struct Formatter<'a> {
    result: &'a PotResult,
    players: &'a [Player],
    ledger: &'a Ledger,
    street: Stage,
    blinds: Option<&'a StackData>,
}

impl Formatter<'_> {
    fn hand_total(&self, id: PlayerId) -> Currency {
        self.ledger.hand_total(self.street, id)
    }

    fn pot(&self, pot: &Pot, kind: PotKind) -> DisplayPot {
        let eligible: Vec<Player> = player::seated(self.players)
            .filter(|p| pot.eligible_players.iter().any(|e| e.id == p.id))
            .cloned()
            .collect();
        let excluded = pot
            .excluded_players
            .iter()
            .filter_map(|e| {
                let player = player::by_id(self.players, e.id)?.clone();
                let reason = if e.is_all_in {
                    format!("All-in for {}", dollars(e.total_contribution))
                } else {
                    "Folded".to_string()
                };
                Some(ExcludedPlayer { player, reason })
            })
            .collect();
        let contributions = pot
            .eligible_players
            .iter()
            .map(|e| DisplayContribution {
                player_id: e.id,
                amount: self.hand_total(e.id),
                is_all_in: e.is_all_in,
            })
            .collect();
        let street_breakdown = match kind {
            PotKind::Main => self.main_breakdown(&eligible),
            PotKind::Side => vec![StreetContribution {
                street: self.street,
                amount: pot.amount,
                detail: format!(
                    "{} eligible for this side pot",
                    count(eligible.len(), "player")
                ),
            }],
        };
        let formula = match kind {
            PotKind::Main => self.main_lines(&eligible),
            PotKind::Side => eligible
                .iter()
                .filter_map(|p| {
                    let total = self.hand_total(p.id);
                    (total > 0).then(|| player_line(p, total))
                })
                .collect(),
        };
        let description = match kind {
            PotKind::Main => format!(
                "The main pot is capped at the smallest all-in amount ({}). {} contributed this \
                 amount, making the main pot {}. Any contributions above this threshold go into \
                 side pots.",
                dollars(pot.capped_at),
                count(eligible.len(), "player"),
                dollars(pot.amount)
            ),
            PotKind::Side => {
                let n = pot.excluded_players.len();
                format!(
                    "This side pot contains contributions from players who put in more than the \
                     previous cap. {} {} excluded because they didn't contribute enough to be \
                     eligible for this pot.",
                    count(n, "player"),
                    if n == 1 { "was" } else { "were" }
                )
            }
        };
        DisplayPot {
            pot_type: kind,
            pot_number: match kind {
                PotKind::Main => None,
                PotKind::Side => Some(pot.pot_number),
            },
            amount: pot.amount,
            eligible_players: eligible,
            excluded_players: excluded,
            contributions,
            street_breakdown,
            calculation: Calculation {
                formula: formula.join("\n"),
                result: format!("Total = {}", dollars(pot.amount)),
            },
            description,
        }
    }

    fn main_breakdown(&self, eligible: &[Player]) -> Vec<StreetContribution> {
        ALL_STAGES
            .into_iter()
            .take_while(|s| *s <= self.street)
            .map(|street| {
                let mut amount = 0;
                let mut contributors = BTreeSet::new();
                for p in eligible {
                    let put_in = self.ledger.street_total(street, p.id);
                    if put_in > 0 {
                        amount += put_in;
                        contributors.insert(p.id);
                    }
                }
                if let (Stage::Preflop, Some(blinds)) = (street, self.blinds) {
                    if let Some(sb) = player::by_position(self.players, Position::SB) {
                        if blinds.small_blind > 0 {
                            amount += blinds.small_blind;
                            contributors.insert(sb.id);
                        }
                    }
                    if let Some(bb) = player::by_position(self.players, Position::BB) {
                        amount += blinds.big_blind;
                        contributors.insert(bb.id);
                    }
                    amount += self.result.dead_money_breakdown.ante;
                }
                let detail = if amount == 0 {
                    "No contributions".to_string()
                } else {
                    format!("{} contributed", count(contributors.len(), "player"))
                };
                StreetContribution {
                    street,
                    amount,
                    detail,
                }
            })
            .collect()
    }

    fn main_lines(&self, eligible: &[Player]) -> Vec<String> {
        let in_pot = |p: &Player| eligible.iter().any(|e| e.id == p.id);
        let mut lines = Vec::new();
        let sb = player::by_position(self.players, Position::SB);
        let bb = player::by_position(self.players, Position::BB);
        let ante = self.result.dead_money_breakdown.ante;
        if let Some(blinds) = self.blinds {
            match bb {
                Some(bb) if !in_pot(bb) && blinds.big_blind + ante > 0 => {
                    lines.push(line("Posted (BB + Ante):", blinds.big_blind + ante));
                }
                Some(bb) if in_pot(bb) && ante > 0 => {
                    lines.push(line("Posted (Ante):", ante));
                }
                _ => {}
            }
            if let Some(sb) = sb {
                if !in_pot(sb) && blinds.small_blind > 0 {
                    lines.push(line("Posted (SB):", blinds.small_blind));
                }
            }
        }
        for p in player::seated(self.players) {
            let mut total = self.hand_total(p.id);
            if let (Some(blinds), true) = (self.blinds, in_pot(p)) {
                total += match p.position {
                    Some(Position::SB) => blinds.small_blind,
                    Some(Position::BB) => blinds.big_blind,
                    _ => 0,
                };
            }
            if total > 0 {
                lines.push(player_line(p, total));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::cascade::process_cascade;
    use crate::fixtures::*;
    use crate::log::Log;
    use crate::pot::calculate_pots;
    use crate::unit::Unit;

    fn stakes() -> StackData {
        StackData {
            small_blind: 500,
            big_blind: 1000,
            ante: 100,
            default_unit: Unit::K,
        }
    }

    #[test]
    fn main_pot_accounts_for_every_chip() {
        let (players, mut data) = four_handed();
        for id in 1..=4 {
            data.entry(id).or_default().posted_ante = 100;
        }
        act(&mut data, 1, PF, Action::Call);
        act(&mut data, 2, PF, Action::Call);
        act(&mut data, 3, PF, Action::Fold);
        act(&mut data, 4, PF, Action::Check);
        let r = process_cascade(PF, &players, &data, Unit::K);
        let pots = calculate_pots(
            PF,
            &players,
            &r.player_data,
            &r.ledger,
            0,
            Unit::K,
            &mut Log::default(),
        );
        let shown = format_pots_for_display(
            &pots,
            &players,
            &r.ledger,
            Stage::Preflop,
            Some(&stakes()),
        );
        let main = &shown.main_pot;
        assert_eq!(main.pot_type, PotKind::Main);
        assert_eq!(main.amount, 3900);
        assert_eq!(main.street_breakdown.len(), 1);
        assert_eq!(main.street_breakdown[0].amount, 3900);
        assert_eq!(main.street_breakdown[0].detail, "4 players contributed");
        assert_eq!(
            main.calculation.formula.lines().collect::<Vec<_>>(),
            vec![
                format!("{:<25}$400", "Posted (Ante):"),
                format!("{:<25}$500", "Posted (SB):"),
                format!("{:<25}$1,000", "Ann (UTG):"),
                format!("{:<25}$1,000", "Ben (Dealer):"),
                format!("{:<25}$1,000", "Dan (BB):"),
            ]
        );
        assert_eq!(main.calculation.result, "Total = $3,900");
        assert!(main.description.starts_with(
            "The main pot is capped at the smallest all-in amount ($1,000). 3 players contributed"
        ));
        assert!(main.excluded_players.is_empty());
    }

    #[test]
    fn side_pot_lists_who_is_left_out() {
        let (mut players, mut data) = three_handed();
        players[0].stack = 500;
        players[1].stack = 2000;
        players[2].stack = 5000;
        act(&mut data, 1, PF, Action::AllIn);
        act_to(&mut data, 2, PF, Action::Raise, 2000);
        act(&mut data, 3, PF, Action::Call);
        let r = process_cascade(PF, &players, &data, Unit::K);
        let pots = calculate_pots(
            PF,
            &players,
            &r.player_data,
            &r.ledger,
            0,
            Unit::K,
            &mut Log::default(),
        );
        let shown = format_pots_for_display(&pots, &players, &r.ledger, Stage::Preflop, None);
        assert_eq!(shown.total_pot, 4500);
        assert_eq!(shown.side_pots.len(), 1);
        let side = &shown.side_pots[0];
        assert_eq!(side.pot_number, Some(1));
        assert_eq!(side.amount, 3000);
        assert_eq!(
            side.street_breakdown[0].detail,
            "2 players eligible for this side pot"
        );
        assert_eq!(side.excluded_players.len(), 1);
        assert_eq!(side.excluded_players[0].player.name, "Alice");
        assert_eq!(side.excluded_players[0].reason, "All-in for $500");
        assert!(side.description.contains("1 player was excluded"));
        assert_eq!(side.calculation.result, "Total = $3,000");
    }

    #[test]
    fn quiet_street_says_so() {
        let (players, mut data) = three_handed();
        for id in 1..=3 {
            act(&mut data, id, PF, Action::Call);
        }
        for id in 1..=3 {
            act(&mut data, id, FLOP, Action::Check);
        }
        let r = process_cascade(FLOP, &players, &data, Unit::K);
        let pots = calculate_pots(
            FLOP,
            &players,
            &r.player_data,
            &r.ledger,
            3000,
            Unit::K,
            &mut Log::default(),
        );
        let shown = format_pots_for_display(&pots, &players, &r.ledger, Stage::Flop, None);
        let breakdown = &shown.main_pot.street_breakdown;
        assert_eq!(breakdown.len(), 2);
        // the ledger holds chips put in beyond the posted blinds
        assert_eq!(breakdown[0].amount, 1500);
        assert_eq!(breakdown[0].detail, "2 players contributed");
        assert_eq!(breakdown[1].amount, 0);
        assert_eq!(breakdown[1].detail, "No contributions");
    }
}
