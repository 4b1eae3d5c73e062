pub mod availability;
pub mod card;

pub use availability::{
    are_all_suits_taken, is_card_available, selected_cards, validate_community_cards, Board,
    CardSet,
};
pub use card::{all_cards, Card, Rank, Suit, ALL_RANKS, ALL_SUITS};
