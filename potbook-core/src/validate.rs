//! Checks run on what the operator entered before a segment is processed.
use crate::action::{Action, PlayerData};
use crate::log::LogItem;
use crate::player::{self, Player};
use crate::segment::Segment;
use crate::PlayerId;
use serde::{Deserialize, Serialize};

/// Problems found, if any. Never a hard error: the caller shows these and decides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl Validation {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: vec![],
        }
    }

    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn merge(&mut self, other: Validation) {
        self.errors.extend(other.errors);
        self.is_valid = self.errors.is_empty();
    }
}

/// The first bet or raise entered without an amount, where the operator should look first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingAmount {
    pub player_id: PlayerId,
    pub player_name: String,
    pub action: Action,
    pub segment: Segment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionValidation {
    pub errors: Vec<String>,
    /// Names of players folded for never acting
    pub auto_folded: Vec<String>,
    pub first_missing_amount: Option<MissingAmount>,
    /// The input with auto-folds written in
    pub player_data: PlayerData,
    pub log: Vec<LogItem>,
}

impl SectionValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Looks over one segment's entries before it is processed.
///
/// In preflop base a player with nothing entered is folded. Anyone who did more than fold
/// needs both hole cards, and a bet or raise needs a positive amount. Bet sizing itself is not
/// checked.
pub fn validate_section(
    segment: Segment,
    players: &[Player],
    player_data: &PlayerData,
) -> SectionValidation {
    let mut out = SectionValidation {
        errors: vec![],
        auto_folded: vec![],
        first_missing_amount: None,
        player_data: player_data.clone(),
        log: vec![],
    };
    for p in player::seated(players) {
        let entry = player_data
            .get(&p.id)
            .and_then(|r| r.entry(segment))
            .cloned()
            .unwrap_or_default();
        let action = match entry.taken() {
            None => {
                if segment == Segment::PREFLOP_BASE {
                    out.player_data
                        .entry(p.id)
                        .or_default()
                        .record(segment, Action::Fold);
                    out.auto_folded.push(p.name.clone());
                    out.log.push(LogItem::AutoFolded(segment, p.id));
                }
                continue;
            }
            Some(Action::Fold) => continue,
            Some(action) => action,
        };

        let cards = player_data
            .get(&p.id)
            .map(|r| r.cards)
            .unwrap_or_default();
        for (i, card) in cards.iter().enumerate() {
            if card.is_none() {
                out.errors.push(format!("{}: Card {} required", p.name, i + 1));
            }
        }

        let needs_amount = matches!(action, Action::Bet | Action::Raise);
        if needs_amount && !entry.amount.map_or(false, |a| a > 0.0) {
            out.errors
                .push(format!("{}: Amount required for {}", p.name, action));
            if out.first_missing_amount.is_none() {
                out.first_missing_amount = Some(MissingAmount {
                    player_id: p.id,
                    player_name: p.name.clone(),
                    action,
                    segment,
                });
            }
        }
    }
    out
}
