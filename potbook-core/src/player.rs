use crate::position::{self, Position};
use crate::{Currency, PlayerId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default, with = "position::label")]
    pub position: Option<Position>,
    /// Chips at the start of the hand, before blinds and antes.
    pub stack: Currency,
}

impl Player {
    pub fn new<S: Into<String>>(
        id: PlayerId,
        name: S,
        position: Option<Position>,
        stack: Currency,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            stack,
        }
    }

    /// An empty name marks an empty seat.
    pub fn is_seated(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Name with position in parentheses, as pot breakdowns print it.
    pub fn label(&self) -> String {
        match self.position {
            Some(p) => format!("{} ({})", self.name, p),
            None => self.name.clone(),
        }
    }
}

pub fn seated(players: &[Player]) -> impl Iterator<Item = &Player> {
    players.iter().filter(|p| p.is_seated())
}

pub fn seated_count(players: &[Player]) -> usize {
    seated(players).count()
}

pub fn by_id(players: &[Player], id: PlayerId) -> Option<&Player> {
    players.iter().find(|p| p.id == id)
}

pub fn by_position(players: &[Player], position: Position) -> Option<&Player> {
    seated(players).find(|p| p.position == Some(position))
}

pub fn by_name<'a>(players: &'a [Player], name: &str) -> Option<&'a Player> {
    seated(players).find(|p| p.name == name)
}

/// Items after index `i`, wrapping around to the front. Each item appears once.
pub(crate) fn iter_after<T>(items: &[T], i: usize) -> impl Iterator<Item = &T> {
    let start = if items.is_empty() { 0 } else { (i + 1) % items.len() };
    items[start..].iter().chain(items[..start].iter())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_seats() {
        let players = vec![
            Player::new(1, "Alice", Some(Position::Dealer), 100),
            Player::new(2, "  ", None, 100),
            Player::new(3, "Carol", Some(Position::BB), 0),
        ];
        assert_eq!(seated_count(&players), 2);
        assert_eq!(by_position(&players, Position::BB).unwrap().id, 3);
        assert!(by_position(&players, Position::SB).is_none());
        assert_eq!(by_name(&players, "Alice").unwrap().id, 1);
        assert_eq!(by_id(&players, 2).unwrap().name, "  ");
        assert_eq!(players[0].label(), "Alice (Dealer)");
    }

    #[test]
    fn wrap_after() {
        let v = [1, 2, 3, 4];
        assert_eq!(iter_after(&v, 1).copied().collect::<Vec<_>>(), vec![3, 4, 1, 2]);
        assert_eq!(iter_after(&v, 3).copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        let empty: [i32; 0] = [];
        assert_eq!(iter_after(&empty, 0).count(), 0);
    }

    #[test]
    fn player_on_the_wire() {
        let p: Player =
            serde_json::from_str(r#"{"id": 4, "name": "Dave", "position": "btn", "stack": 900}"#)
                .unwrap();
        assert_eq!(p.position, Some(Position::Dealer));
        let blank: Player =
            serde_json::from_str(r#"{"id": 5, "name": "Eve", "position": "", "stack": 10}"#)
                .unwrap();
        assert_eq!(blank.position, None);
        assert!(serde_json::to_string(&blank).unwrap().contains(r#""position":"""#));
    }
}
