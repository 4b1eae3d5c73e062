use super::gather::PlayerContribution;
use crate::segment::Stage;
use crate::Currency;
use serde::{Deserialize, Serialize};

/// Chips in the pot that no remaining player can win back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeadMoney {
    pub total: Currency,
    pub ante: Currency,
    pub folded_blinds: Currency,
    pub folded_bets: Currency,
}

pub fn calculate_dead_money(stage: Stage, gathered: &[PlayerContribution]) -> DeadMoney {
    let mut dead = DeadMoney::default();
    for c in gathered {
        if stage.is_preflop() {
            dead.ante += c.posted_ante;
            if c.is_folded {
                dead.folded_blinds += c.posted_blinds();
            }
        }
        if c.is_folded && c.total_contributed > 0 {
            dead.folded_bets += if stage.is_preflop() {
                // blinds are already counted above, and the ante never enters the total
                (c.total_contributed - c.posted_blinds()).max(0)
            } else {
                c.total_contributed
            };
        }
    }
    dead.total = dead.ante + dead.folded_blinds + dead.folded_bets;
    dead
}
