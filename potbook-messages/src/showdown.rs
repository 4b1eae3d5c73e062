//! Client --> engine: who won what. Engine --> client: the next hand.

use crate::{RespErrCode, SettleRequest, SettleResponse};
use potbook_core::history::{format_hand, HandHeader, ParsedHand, PlayerSetup};
use potbook_core::log::Log;
use potbook_core::next_hand::{process_showdown, PotSummary, Showdown, WinnerSelection};
use potbook_core::{Ledger, Player, PlayerData};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowdownRequest {
    pub players: Vec<Player>,
    #[serde(default)]
    pub player_data: PlayerData,
    #[serde(default)]
    pub ledger: Ledger,
    pub pots: Vec<PotSummary>,
    pub winner_selections: Vec<WinnerSelection>,
    /// When given, the response carries the next hand as text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<HandHeader>,
    #[serde(default)]
    pub log: Log,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowdownResponse {
    pub showdown: Showdown,
    pub log: Log,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_hand_text: Option<String>,
}

impl ShowdownRequest {
    /// Picks up where a settled river (or wherever the hand ended) left off.
    pub fn after(
        settled: &SettleRequest,
        response: &SettleResponse,
        winner_selections: Vec<WinnerSelection>,
    ) -> Self {
        Self {
            players: settled.players.clone(),
            player_data: response.cascade.player_data.clone(),
            ledger: response.cascade.ledger.clone(),
            pots: PotSummary::from_result(&response.pots),
            winner_selections,
            header: None,
            log: response.log.clone(),
        }
    }

    pub fn resolve(&self) -> Result<ShowdownResponse, RespErrCode> {
        let mut log = self.log.clone();
        let showdown = process_showdown(
            &self.players,
            &self.player_data,
            &self.ledger,
            &self.pots,
            &self.winner_selections,
            &mut log,
        )?;
        let next_hand_text = self.header.as_ref().map(|header| {
            let current = ParsedHand {
                header: header.clone(),
                players: self
                    .players
                    .iter()
                    .map(|p| PlayerSetup {
                        name: p.name.clone(),
                        position: p.position,
                        stack: p.stack,
                    })
                    .collect(),
            };
            format_hand(&current.next(&showdown.next_hand))
        });
        Ok(ShowdownResponse {
            showdown,
            log,
            next_hand_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use potbook_core::action::Action;
    use potbook_core::history::parse_hand;
    use potbook_core::log::LogItem;
    use potbook_core::{Segment, StackData};

    const HAND: &str = "Hand (12)
started_at: 20:00:00 ended_at: 20:04:31
SB 500 BB 1000 Ante 0
Stack Setup:
Alice Dealer 0
Bob SB 8500
Carol BB 12000";

    #[test]
    fn busted_button_leaves_heads_up() {
        let hand = parse_hand(HAND).unwrap();
        let mut settle = SettleRequest::new(Segment::PREFLOP_BASE, hand.players());
        settle.stack_data = StackData {
            small_blind: hand.header.sb,
            big_blind: hand.header.bb,
            ..StackData::default()
        };
        let data = &mut settle.player_data;
        data.entry(2).or_default().posted_sb = 500;
        data.entry(3).or_default().posted_bb = 1000;
        for id in 2..=3 {
            data.entry(id).or_default().cards = ["9s".parse().ok(), "9d".parse().ok()];
        }
        data.entry(2)
            .or_default()
            .record(Segment::PREFLOP_BASE, Action::Call);
        data.entry(3)
            .or_default()
            .record(Segment::PREFLOP_BASE, Action::Check);
        let settled = settle.settle();
        assert_eq!(settled.pots.total_pot, 2000);

        let winner = WinnerSelection {
            pot_name: "Main Pot".to_string(),
            pot_type: "main".to_string(),
            winner_names: vec!["Bob".to_string()],
        };
        let mut req = ShowdownRequest::after(&settle, &settled, vec![winner]);
        req.header = Some(hand.header.clone());
        let resp = req.resolve().unwrap();
        assert!(resp.showdown.validation.is_valid);
        assert_eq!(
            &resp.log.since(0)[..settled.log.last_seq()],
            settled.log.since(0)
        );
        assert_eq!(resp.showdown.new_stacks["Bob"], 9500);
        assert_eq!(resp.showdown.new_stacks["Carol"], 11_000);
        assert!(resp
            .log
            .since(settled.log.last_seq())
            .iter()
            .any(|(_, i)| *i == LogItem::Eliminated("Alice".to_string())));
        assert_eq!(
            resp.next_hand_text.as_deref(),
            Some(
                "Hand (13)
started_at: 20:04:31 ended_at: HH:MM:SS
SB 500 BB 1000 Ante 0
Stack Setup:
Carol SB 11000
Bob BB 9500"
            )
        );
    }

    #[test]
    fn no_dealer_is_an_error() {
        let req = ShowdownRequest {
            players: vec![
                Player::new(1, "Alice", None, 100),
                Player::new(2, "Bob", None, 100),
                Player::new(3, "Carol", None, 100),
            ],
            player_data: PlayerData::new(),
            ledger: Ledger::default(),
            pots: vec![],
            winner_selections: vec![],
            header: None,
            log: Log::default(),
        };
        assert_eq!(req.resolve(), Err(RespErrCode::NoDealer));
    }
}
