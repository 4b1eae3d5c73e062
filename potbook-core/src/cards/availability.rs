//! Which cards are still free to hand out when the operator types in hole and board cards.
use super::card::{Card, Rank, ALL_SUITS};
use crate::action::PlayerData;
use crate::segment::Stage;
use crate::validate::Validation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type CardSet = BTreeSet<Card>;

/// Community cards as entered so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    pub flop: [Option<Card>; 3],
    pub turn: Option<Card>,
    pub river: Option<Card>,
}

impl Board {
    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.flop
            .iter()
            .chain([&self.turn, &self.river])
            .filter_map(|c| *c)
    }
}

/// A card is free unless someone already holds it. `own` is whatever the slot being filled
/// holds now, which is always free to keep.
pub fn is_card_available(card: Card, selected: &CardSet, own: Option<Card>) -> bool {
    !selected.contains(&card) || own == Some(card)
}

pub fn are_all_suits_taken(rank: Rank, selected: &CardSet, own: Option<Card>) -> bool {
    !ALL_SUITS
        .into_iter()
        .any(|suit| is_card_available(Card::new(rank, suit), selected, own))
}

/// Every hole card and board card entered.
pub fn selected_cards(player_data: &PlayerData, board: &Board) -> CardSet {
    player_data
        .values()
        .flat_map(|r| r.cards.iter().flatten().copied())
        .chain(board.cards())
        .collect()
}

/// The flop has to be complete before moving to the turn, and the turn card before the river.
pub fn validate_community_cards(target: Stage, board: &Board) -> Validation {
    if target < Stage::Turn {
        return Validation::ok();
    }
    if board.flop.iter().any(Option::is_none) {
        return Validation::from_errors(vec![format!(
            "Flop must have 3 complete cards (rank and suit) before proceeding to {target}"
        )]);
    }
    if target == Stage::River && board.turn.is_none() {
        return Validation::from_errors(vec![
            "Turn must have 1 complete card (rank and suit) before proceeding to River".to_string(),
        ]);
    }
    Validation::ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    #[test]
    fn taken_unless_its_yours() {
        let mut data = PlayerData::new();
        data.entry(1).or_default().cards = [Some(card("As")), Some(card("Ah"))];
        data.entry(2).or_default().cards = [Some(card("Ad")), None];
        let board = Board {
            flop: [Some(card("Ac")), Some(card("7d")), None],
            ..Board::default()
        };
        let selected = selected_cards(&data, &board);
        assert_eq!(selected.len(), 5);
        assert!(!is_card_available(card("Ah"), &selected, None));
        assert!(is_card_available(card("Ah"), &selected, Some(card("Ah"))));
        assert!(is_card_available(card("Kh"), &selected, None));
        assert!(are_all_suits_taken(Rank::Ace, &selected, None));
        assert!(!are_all_suits_taken(Rank::Ace, &selected, Some(card("Ad"))));
        assert!(!are_all_suits_taken(Rank::Seven, &selected, None));
        assert_eq!(card("Ad").suit, Suit::Diamond);
    }

    #[test]
    fn board_has_to_be_filled_in_order() {
        let mut board = Board::default();
        assert!(validate_community_cards(Stage::Flop, &board).is_valid);
        let v = validate_community_cards(Stage::Turn, &board);
        assert_eq!(
            v.errors,
            vec!["Flop must have 3 complete cards (rank and suit) before proceeding to turn"]
        );
        board.flop = [Some(card("2c")), Some(card("3c")), Some(card("4c"))];
        assert!(validate_community_cards(Stage::Turn, &board).is_valid);
        let v = validate_community_cards(Stage::River, &board);
        assert!(!v.is_valid);
        assert!(v.errors[0].starts_with("Turn must have 1 complete card"));
        board.turn = Some(card("5c"));
        assert!(validate_community_cards(Stage::River, &board).is_valid);
    }
}
