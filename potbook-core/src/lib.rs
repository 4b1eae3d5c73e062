pub mod action;
pub mod cards;
pub mod cascade;
pub mod display;
pub mod engine;
pub mod history;
pub mod ledger;
pub mod log;
pub mod next_hand;
pub mod player;
pub mod position;
pub mod pot;
pub mod round;
pub mod segment;
pub mod unit;
pub mod validate;

#[cfg(test)]
mod fixtures;

pub use action::{Action, ActionEntry, PlayerData, PlayerRecord};
pub use ledger::{Ledger, ProcessedSections};
pub use player::Player;
pub use position::Position;
pub use segment::{Level, Segment, Stage};
pub use unit::Unit;

pub const MAX_PLAYERS: usize = 9;
pub const MIN_PLAYERS: usize = 2;
pub const DEFAULT_UNIT: Unit = Unit::K;
pub type PlayerId = i32;
pub type Currency = i64;
pub type SeqNum = usize;

#[derive(Debug, derive_more::Display)]
pub enum EngineError {
    #[display(fmt = "Unsupported player count: {}", _0)]
    UnsupportedPlayerCount(usize),
    #[display(fmt = "No Dealer found in current hand")]
    DealerNotFound,
    History(history::HistoryError),
}

impl std::error::Error for EngineError {}

impl From<history::HistoryError> for EngineError {
    fn from(e: history::HistoryError) -> Self {
        Self::History(e)
    }
}

/// Blind and ante structure for the hand, plus the unit amounts are entered in when a record
/// carries none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StackData {
    pub small_blind: Currency,
    pub big_blind: Currency,
    pub ante: Currency,
    #[serde(default)]
    pub default_unit: Unit,
}

impl Default for StackData {
    fn default() -> Self {
        Self {
            small_blind: 0,
            big_blind: 0,
            ante: 0,
            default_unit: DEFAULT_UNIT,
        }
    }
}
