//! Client --> engine: the table and everything entered so far, settled through one segment.

use potbook_core::cascade::{resume_cascade, CascadeResult};
use potbook_core::display::{format_pots_for_display, DisplayPotData};
use potbook_core::log::Log;
use potbook_core::pot::{calculate_pots, PotResult};
use potbook_core::round::{check_complete, RoundCompletion};
use potbook_core::validate::{validate_section, SectionValidation};
use potbook_core::{Currency, Ledger, Player, PlayerData, Segment, StackData};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettleRequest {
    /// Settle up to and including this segment
    pub segment: Segment,
    pub players: Vec<Player>,
    #[serde(default)]
    pub player_data: PlayerData,
    #[serde(default)]
    pub stack_data: StackData,
    /// Chips already in the middle from earlier streets
    #[serde(default)]
    pub previous_street_pot: Currency,
    /// What an earlier request already worked out. Segments it marks processed are kept.
    #[serde(default)]
    pub ledger: Ledger,
    /// The hand's log so far. New entries are numbered on from it.
    #[serde(default)]
    pub log: Log,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettleResponse {
    pub validation: SectionValidation,
    pub cascade: CascadeResult,
    pub completion: RoundCompletion,
    pub pots: PotResult,
    pub display: DisplayPotData,
    /// The request's log with this settle's entries added
    pub log: Log,
}

impl SettleRequest {
    pub fn new(segment: Segment, players: Vec<Player>) -> Self {
        Self {
            segment,
            players,
            player_data: PlayerData::new(),
            stack_data: StackData::default(),
            previous_street_pot: 0,
            ledger: Ledger::default(),
            log: Log::default(),
        }
    }

    /// The request for the next segment of the same hand, carrying on from `settled`.
    pub fn carry_on(&self, settled: &SettleResponse, segment: Segment) -> Self {
        Self {
            segment,
            player_data: settled.cascade.player_data.clone(),
            ledger: settled.cascade.ledger.clone(),
            log: settled.log.clone(),
            ..self.clone()
        }
    }

    /// Validates the segment, runs the cascade, checks whether betting is done and builds the
    /// pots. Validation problems are reported, not fatal.
    pub fn settle(&self) -> SettleResponse {
        let unit = self.stack_data.default_unit;
        let validation = validate_section(self.segment, &self.players, &self.player_data);
        let cascade = resume_cascade(
            self.segment,
            &self.players,
            &validation.player_data,
            self.ledger.clone(),
            unit,
        );
        let completion = check_complete(self.segment, &self.players, &cascade.player_data);

        let mut log = self.log.clone();
        log.extend(validation.log.iter().cloned());
        log.append(&cascade.log);
        let pots = calculate_pots(
            self.segment,
            &self.players,
            &cascade.player_data,
            &cascade.ledger,
            self.previous_street_pot,
            unit,
            &mut log,
        );
        let display = format_pots_for_display(
            &pots,
            &self.players,
            &cascade.ledger,
            self.segment.stage,
            Some(&self.stack_data),
        );
        SettleResponse {
            validation,
            cascade,
            completion,
            pots,
            display,
            log,
        }
    }
}
