use crate::player::Player;
use crate::segment::Stage;
use crate::EngineError;
use enum_map::Enum;
use serde::{Deserialize, Serialize};

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Enum, Serialize, Deserialize)]
pub enum Position {
    Dealer,
    SB,
    BB,
    UTG,
    #[serde(rename = "UTG+1")]
    UTG1,
    #[serde(rename = "UTG+2")]
    UTG2,
    LJ,
    MP,
    #[serde(rename = "MP+1")]
    MP1,
    #[serde(rename = "MP+2")]
    MP2,
    HJ,
    CO,
}

use Position::*;

const PREFLOP_ORDER: [Position; 12] = [
    UTG, UTG1, UTG2, LJ, MP, MP1, MP2, HJ, CO, Dealer, SB, BB,
];
const POSTFLOP_ORDER: [Position; 12] = [
    SB, BB, UTG, UTG1, UTG2, LJ, MP, MP1, MP2, HJ, CO, Dealer,
];

/// Seats clockwise from the button for each supported table size.
const TABLES: [&[Position]; 8] = [
    &[SB, BB],
    &[Dealer, SB, BB],
    &[Dealer, SB, BB, UTG],
    &[Dealer, SB, BB, UTG, CO],
    &[Dealer, SB, BB, UTG, MP, CO],
    &[Dealer, SB, BB, UTG, MP, HJ, CO],
    &[Dealer, SB, BB, UTG, UTG1, MP, HJ, CO],
    &[Dealer, SB, BB, UTG, UTG1, UTG2, MP, HJ, CO],
];

impl Position {
    pub const fn label(&self) -> &'static str {
        match self {
            Dealer => "Dealer",
            SB => "SB",
            BB => "BB",
            UTG => "UTG",
            UTG1 => "UTG+1",
            UTG2 => "UTG+2",
            LJ => "LJ",
            MP => "MP",
            MP1 => "MP+1",
            MP2 => "MP+2",
            HJ => "HJ",
            CO => "CO",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match canonicalize(label).as_str() {
            "Dealer" => Some(Dealer),
            "SB" => Some(SB),
            "BB" => Some(BB),
            "UTG" => Some(UTG),
            "UTG+1" => Some(UTG1),
            "UTG+2" => Some(UTG2),
            "LJ" => Some(LJ),
            "MP" => Some(MP),
            "MP+1" => Some(MP1),
            "MP+2" => Some(MP2),
            "HJ" => Some(HJ),
            "CO" => Some(CO),
            _ => None,
        }
    }

    /// Dealer, SB and BB are the only positions written into hand text.
    pub const fn is_token(&self) -> bool {
        matches!(self, Dealer | SB | BB)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Maps the many ways an operator types a seat onto one spelling. Anything unrecognized comes
/// back as it was given.
pub fn canonicalize(label: &str) -> String {
    let canonical = match label.trim().to_uppercase().as_str() {
        "BTN" | "BUTTON" | "D" | "DEALER" => "Dealer",
        "SB" | "SMALL BLIND" => "SB",
        "BB" | "BIG BLIND" => "BB",
        "UTG" => "UTG",
        "UTG+1" => "UTG+1",
        "UTG+2" => "UTG+2",
        "LJ" | "LOJACK" => "LJ",
        "MP" => "MP",
        "MP+1" => "MP+1",
        "MP+2" => "MP+2",
        "CO" | "CUTOFF" => "CO",
        "HJ" | "HIJACK" => "HJ",
        _ => return label.to_string(),
    };
    canonical.to_string()
}

pub fn table_positions(count: usize) -> Result<&'static [Position], EngineError> {
    if (crate::MIN_PLAYERS..=crate::MAX_PLAYERS).contains(&count) {
        Ok(TABLES[count - crate::MIN_PLAYERS])
    } else {
        Err(EngineError::UnsupportedPlayerCount(count))
    }
}

/// The order positions act in on `stage` with `count` players dealt in.
pub fn turn_order(count: usize, stage: Stage) -> Vec<Position> {
    let preflop = stage == Stage::Preflop;
    match count {
        0 | 1 => vec![],
        2 if preflop => vec![SB, Dealer, BB],
        2 => vec![BB, SB, Dealer],
        3 if preflop => vec![Dealer, SB, BB],
        3 => vec![SB, BB, Dealer],
        _ => {
            let order = if preflop { PREFLOP_ORDER } else { POSTFLOP_ORDER };
            match table_positions(count) {
                Ok(seats) => order.into_iter().filter(|p| seats.contains(p)).collect(),
                Err(_) => order.to_vec(),
            }
        }
    }
}

/// Sort key for acting order. Labels the table size doesn't normally use still sort by the
/// full-ring order, after the ones it does; unlabeled players go last.
pub(crate) fn action_rank(position: Option<Position>, count: usize, stage: Stage) -> usize {
    let Some(position) = position else {
        return usize::MAX;
    };
    if let Some(idx) = turn_order(count, stage).iter().position(|p| *p == position) {
        return idx;
    }
    let full = if stage == Stage::Preflop {
        PREFLOP_ORDER
    } else {
        POSTFLOP_ORDER
    };
    full.iter().position(|p| *p == position).unwrap_or(full.len()) + full.len()
}

/// Assigns seats to the players in the order given, anchored on whoever already holds the
/// button, else the small blind, else the big blind. Players without a name or chips are left
/// alone.
pub fn infer_positions(players: &[Player]) -> Vec<Player> {
    let active: Vec<usize> = players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_seated() && p.stack > 0)
        .map(|(i, _)| i)
        .collect();
    let Ok(table) = table_positions(active.len()) else {
        return players.to_vec();
    };
    let anchor = [Dealer, SB, BB].into_iter().find_map(|anchor| {
        let idx = active
            .iter()
            .position(|&i| players[i].position == Some(anchor))?;
        // heads-up has no separate button; the small blind holds it
        let offset = table
            .iter()
            .position(|p| *p == anchor)
            .unwrap_or_default();
        Some((idx, offset))
    });
    let (anchor_idx, anchor_offset) = anchor.unwrap_or((0, 0));
    let n = active.len();
    let mut out = players.to_vec();
    for (idx, &i) in active.iter().enumerate() {
        let seat = (idx + n - anchor_idx + anchor_offset) % n;
        out[i].position = Some(table[seat]);
    }
    out
}

/// Serializes an optional position as its label, with an empty string for none.
pub(crate) mod label {
    use super::Position;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(p: &Option<Position>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(p.map(|p| p.label()).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Position>, D::Error> {
        let s = Option::<String>::deserialize(d)?;
        Ok(s.as_deref().and_then(Position::from_label))
    }
}
