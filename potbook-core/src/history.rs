//! The plain-text hand setup operators paste in and copy out:
//!
//! ```text
//! Hand (49)
//! started_at: 00:05:40 ended_at: HH:MM:SS
//! SB 500 BB 1000 Ante 100
//! Stack Setup:
//! Bob Dealer 116000
//! Charlie SB 48000
//! David BB 0
//! Alice 80000
//! ```
//!
//! Only Dealer, SB and BB are written next to a name.
use crate::next_hand::NextHandPlayer;
use crate::player::Player;
use crate::position::Position;
use crate::{Currency, PlayerId, StackData};
use serde::{Deserialize, Serialize};

const STACK_SETUP: &str = "Stack Setup:";
const UNKNOWN_TIME: &str = "HH:MM:SS";

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum HistoryError {
    #[display(fmt = "Hand text needs at least 4 lines, got {}", _0)]
    TooFewLines(usize),
    #[display(fmt = "Bad stack line: {}", _0)]
    BadStack(String),
}

impl std::error::Error for HistoryError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandHeader {
    pub hand_number: String,
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    pub sb: Currency,
    pub bb: Currency,
    pub ante: Currency,
}

impl HandHeader {
    pub fn stack_data(&self) -> StackData {
        StackData {
            small_blind: self.sb,
            big_blind: self.bb,
            ante: self.ante,
            ..StackData::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSetup {
    pub name: String,
    #[serde(default, with = "crate::position::label")]
    pub position: Option<Position>,
    pub stack: Currency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedHand {
    pub header: HandHeader,
    pub players: Vec<PlayerSetup>,
}

impl ParsedHand {
    /// Players seated in the order listed, numbered from 1.
    pub fn players(&self) -> Vec<Player> {
        self.players
            .iter()
            .zip(1..)
            .map(|(p, id): (&PlayerSetup, PlayerId)| {
                Player::new(id, p.name.clone(), p.position, p.stack)
            })
            .collect()
    }

    /// The setup for the hand after this one. The new hand starts when this one ended, if
    /// that is known.
    pub fn next(&self, next_hand: &[NextHandPlayer]) -> ParsedHand {
        let hand_number = match self.header.hand_number.parse::<u64>() {
            Ok(n) => (n + 1).to_string(),
            Err(_) => self.header.hand_number.clone(),
        };
        ParsedHand {
            header: HandHeader {
                hand_number,
                started_at: self
                    .header
                    .ended_at
                    .clone()
                    .unwrap_or_else(|| self.header.started_at.clone()),
                ended_at: None,
                ..self.header.clone()
            },
            players: next_hand
                .iter()
                .map(|p| PlayerSetup {
                    name: p.name.clone(),
                    position: Some(p.position).filter(Position::is_token),
                    stack: p.stack,
                })
                .collect(),
        }
    }
}

fn is_time(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == ':')
}

/// The word after `key` on the line, if there is one.
fn after<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let mut words = line.split_whitespace();
    words.find(|w| *w == key)?;
    words.next()
}

fn whole_chips(s: &str) -> Option<Currency> {
    s.replace(',', "").parse::<Currency>().ok()
}

fn parse_player(line: &str) -> Result<Option<PlayerSetup>, HistoryError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((stack, rest)) = words.split_last() else {
        return Ok(None);
    };
    if rest.is_empty() {
        return Ok(None);
    }
    let stack = whole_chips(stack)
        .filter(|s| *s >= 0)
        .ok_or_else(|| HistoryError::BadStack(line.trim().to_string()))?;
    let (name, position) = match rest.split_last() {
        Some((last, name)) if !name.is_empty() => match Position::from_label(last) {
            Some(p) if p.is_token() && *last == p.label() => (name.join(" "), Some(p)),
            _ => (rest.join(" "), None),
        },
        _ => (rest.join(" "), None),
    };
    Ok(Some(PlayerSetup {
        name,
        position,
        stack,
    }))
}

/// Reads a hand setup. Header fields that can't be read come back empty or 0; a player line
/// whose stack isn't a whole, non-negative number is an error.
pub fn parse_hand(text: &str) -> Result<ParsedHand, HistoryError> {
    let lines: Vec<&str> = text.trim().lines().collect();
    if lines.len() < 4 {
        return Err(HistoryError::TooFewLines(lines.len()));
    }

    let hand_number = lines[0]
        .split_once('(')
        .and_then(|(_, rest)| rest.split_once(')'))
        .map(|(n, _)| n.trim())
        .filter(|n| n.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or_default()
        .to_string();
    let time = |key| after(lines[1], key).filter(|t| is_time(t));
    let chips = |key| {
        after(lines[2], key)
            .and_then(whole_chips)
            .unwrap_or_default()
    };
    let header = HandHeader {
        hand_number,
        started_at: time("started_at:").unwrap_or_default().to_string(),
        ended_at: time("ended_at:").map(str::to_string),
        sb: chips("SB"),
        bb: chips("BB"),
        ante: chips("Ante"),
    };

    let mut players = vec![];
    for line in &lines[4..] {
        if let Some(p) = parse_player(line)? {
            players.push(p);
        }
    }
    Ok(ParsedHand { header, players })
}

pub fn format_hand(hand: &ParsedHand) -> String {
    let h = &hand.header;
    let mut lines = vec![
        format!("Hand ({})", h.hand_number),
        format!(
            "started_at: {} ended_at: {}",
            h.started_at,
            h.ended_at.as_deref().unwrap_or(UNKNOWN_TIME)
        ),
        format!("SB {} BB {} Ante {}", h.sb, h.bb, h.ante),
        STACK_SETUP.to_string(),
    ];
    for p in &hand.players {
        lines.push(match p.position.filter(Position::is_token) {
            Some(pos) => format!("{} {} {}", p.name, pos, p.stack),
            None => format!("{} {}", p.name, p.stack),
        });
    }
    lines.join("\n")
}
