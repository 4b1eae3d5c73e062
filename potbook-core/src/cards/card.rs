use enum_map::Enum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Highest first, the order card pickers list them in.
pub const ALL_RANKS: [Rank; 13] = [
    Rank::Ace,
    Rank::King,
    Rank::Queen,
    Rank::Jack,
    Rank::Ten,
    Rank::Nine,
    Rank::Eight,
    Rank::Seven,
    Rank::Six,
    Rank::Five,
    Rank::Four,
    Rank::Three,
    Rank::Two,
];
pub const ALL_SUITS: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Diamond, Suit::Club];

#[derive(Hash, Enum, Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const fn symbol(&self) -> char {
        match self {
            Self::Two => '2',
            Self::Three => '3',
            Self::Four => '4',
            Self::Five => '5',
            Self::Six => '6',
            Self::Seven => '7',
            Self::Eight => '8',
            Self::Nine => '9',
            Self::Ten => 'T',
            Self::Jack => 'J',
            Self::Queen => 'Q',
            Self::King => 'K',
            Self::Ace => 'A',
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<char> for Rank {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        ALL_RANKS
            .into_iter()
            .find(|r| r.symbol() == c.to_ascii_uppercase())
            .ok_or_else(|| format!("Bad rank: {c}"))
    }
}

#[derive(Hash, Enum, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Spade,
    Heart,
    Diamond,
    Club,
}

impl Suit {
    pub const fn symbol(&self) -> char {
        match self {
            Self::Spade => '♠',
            Self::Heart => '♥',
            Self::Diamond => '♦',
            Self::Club => '♣',
        }
    }

    const fn letter(&self) -> char {
        match self {
            Self::Spade => 's',
            Self::Heart => 'h',
            Self::Diamond => 'd',
            Self::Club => 'c',
        }
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Takes the symbol or the letter.
impl TryFrom<char> for Suit {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        ALL_SUITS
            .into_iter()
            .find(|s| s.symbol() == c || s.letter() == c.to_ascii_lowercase())
            .ok_or_else(|| format!("Bad suit: {c}"))
    }
}

/// Written rank then suit, as in `A♠`. On the wire it is that string.
#[derive(Hash, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(s), None) => Ok(Card::new(r.try_into()?, s.try_into()?)),
            _ => Err(format!("Failed to parse card: {s}")),
        }
    }
}

impl TryFrom<String> for Card {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Card> for String {
    fn from(c: Card) -> Self {
        c.to_string()
    }
}

/// Every card, spades first and aces first within a suit.
pub fn all_cards() -> impl Iterator<Item = Card> {
    use itertools::Itertools;
    ALL_SUITS
        .into_iter()
        .cartesian_product(ALL_RANKS)
        .map(|(suit, rank)| Card::new(rank, suit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_and_symbols() {
        let a: Card = "As".parse().unwrap();
        let b: Card = "A♠".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "A♠");
        assert_eq!("td".parse::<Card>().unwrap(), Card::new(Rank::Ten, Suit::Diamond));
        assert!("A".parse::<Card>().is_err());
        assert!("Ax".parse::<Card>().is_err());
        assert!("1s".parse::<Card>().is_err());
        assert!("Ks ".parse::<Card>().is_ok());
        assert!("Ksh".parse::<Card>().is_err());
    }

    #[test]
    fn deck_is_complete() {
        let cards: Vec<Card> = all_cards().collect();
        assert_eq!(cards.len(), 52);
        assert_eq!(cards[0].to_string(), "A♠");
        assert_eq!(cards[51].to_string(), "2♣");
        assert!(Rank::Ace > Rank::King);
    }

    #[test]
    fn card_on_the_wire() {
        let c = Card::new(Rank::Queen, Suit::Heart);
        assert_eq!(serde_json::to_string(&c).unwrap(), r#""Q♥""#);
        let back: Card = serde_json::from_str(r#""qh""#).unwrap();
        assert_eq!(back, c);
        assert!(serde_json::from_str::<Card>(r#""Zz""#).is_err());
    }
}
