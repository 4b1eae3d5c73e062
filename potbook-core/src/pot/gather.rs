use crate::action::{record_of, PlayerData};
use crate::ledger::Ledger;
use crate::player::{self, Player};
use crate::position::{self, Position};
use crate::segment::{Level, Segment, ALL_LEVELS};
use crate::{Currency, PlayerId};
use enum_map::EnumMap;
use serde::{Deserialize, Serialize};

/// One seated player's chips on a street, as far as the pot is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerContribution {
    pub player_id: PlayerId,
    pub name: String,
    #[serde(default, with = "position::label")]
    pub position: Option<Position>,
    /// Included levels plus, preflop, the posted blinds. Never the ante.
    pub total_contributed: Currency,
    pub contributions: EnumMap<Level, Currency>,
    pub posted_sb: Currency,
    pub posted_bb: Currency,
    pub posted_ante: Currency,
    pub is_folded: bool,
    pub is_all_in: bool,
    pub current_stack: Currency,
}

impl PlayerContribution {
    pub fn posted_blinds(&self) -> Currency {
        self.posted_sb + self.posted_bb
    }
}

/// Collects every seated player's contribution on `segment`'s street.
///
/// Levels up to and including `segment.level` are summed, or only `segment.level` itself when
/// `only_current` is set. Posted blinds ride along with preflop base, cut down to what the
/// player's stack covers.
pub fn gather_contributions(
    segment: Segment,
    players: &[Player],
    player_data: &PlayerData,
    ledger: &Ledger,
    only_current: bool,
) -> Vec<PlayerContribution> {
    let included = |l: Level| {
        if only_current {
            l == segment.level
        } else {
            l <= segment.level
        }
    };
    let with_blinds = segment.stage.is_preflop() && included(Level::Base);

    player::seated(players)
        .map(|p| {
            let record = record_of(player_data, p.id);
            let mut contributions = EnumMap::default();
            for level in ALL_LEVELS.into_iter().filter(|l| included(*l)) {
                contributions[level] =
                    ledger.contribution(Segment::new(segment.stage, level), p.id);
            }
            let (posted_sb, posted_bb, posted_ante) = if with_blinds {
                record.posts_covered(p.stack)
            } else {
                (0, 0, 0)
            };
            let current_stack = ledger
                .updated_stack(segment, p.id)
                .or_else(|| ledger.carried_stack(segment, p.id))
                .unwrap_or(p.stack);
            PlayerContribution {
                player_id: p.id,
                name: p.name.clone(),
                position: p.position,
                total_contributed: contributions.values().sum::<Currency>()
                    + posted_sb
                    + posted_bb,
                contributions,
                posted_sb,
                posted_bb,
                posted_ante,
                is_folded: record.out_of_pot(segment),
                is_all_in: current_stack <= 0,
                current_stack: current_stack.max(0),
            }
        })
        .collect()
}
