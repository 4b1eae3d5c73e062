use crate::cards::Card;
use crate::segment::{Level, Segment, Stage};
use crate::unit::{self, Unit};
use crate::{Currency, PlayerId};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::str::FromStr;

pub type PlayerData = BTreeMap<PlayerId, PlayerRecord>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "fold")]
    Fold,
    #[serde(rename = "check")]
    Check,
    #[serde(rename = "call")]
    Call,
    #[serde(rename = "bet")]
    Bet,
    #[serde(rename = "raise")]
    Raise,
    #[serde(rename = "all-in")]
    AllIn,
    #[serde(rename = "no action")]
    NoAction,
}

impl Action {
    pub const fn is_allin(&self) -> bool {
        matches!(self, Action::AllIn)
    }

    pub const fn is_fold(&self) -> bool {
        matches!(self, Action::Fold)
    }

    /// Actions that put chips in.
    pub const fn is_wager(&self) -> bool {
        matches!(
            self,
            Action::Call | Action::Bet | Action::Raise | Action::AllIn
        )
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Action::Fold => "fold",
            Action::Check => "check",
            Action::Call => "call",
            Action::Bet => "bet",
            Action::Raise => "raise",
            Action::AllIn => "all-in",
            Action::NoAction => "no action",
        }
    }

    /// Capitalized for pot summaries.
    pub const fn title(&self) -> &'static str {
        match self {
            Action::Fold => "Fold",
            Action::Check => "Check",
            Action::Call => "Call",
            Action::Bet => "Bet",
            Action::Raise => "Raise",
            Action::AllIn => "All-in",
            Action::NoAction => "No action",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fold" => Ok(Action::Fold),
            "check" => Ok(Action::Check),
            "call" => Ok(Action::Call),
            "bet" => Ok(Action::Bet),
            "raise" => Ok(Action::Raise),
            "all-in" | "allin" | "all in" => Ok(Action::AllIn),
            "no action" => Ok(Action::NoAction),
            _ => Err(format!("Unknown action: {s}")),
        }
    }
}

/// What one player did in one segment. The amount is in display units, as entered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionEntry {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_action"
    )]
    pub action: Option<Action>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "unit::de_amount"
    )]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

impl ActionEntry {
    pub fn new(action: Action) -> Self {
        Self {
            action: Some(action),
            ..Self::default()
        }
    }

    pub fn with_amount(action: Action, amount: f64, unit: Unit) -> Self {
        Self {
            action: Some(action),
            amount: Some(amount),
            unit: Some(unit),
        }
    }

    /// The action, if the player has really done something.
    pub fn taken(&self) -> Option<Action> {
        self.action.filter(|a| *a != Action::NoAction)
    }

    /// Recorded amount in chips, `default_unit` standing in for a missing unit.
    pub fn chips(&self, default_unit: Unit) -> Currency {
        self.amount
            .map(|a| unit::to_actual(a, Some(self.unit.unwrap_or(default_unit))))
            .unwrap_or_default()
    }

    /// Recorded amount in chips, guessing the scale when no unit was given.
    pub fn chips_guessing_unit(&self) -> Currency {
        self.amount
            .map(|a| unit::to_actual(a, self.unit))
            .unwrap_or_default()
    }
}

/// Unknown or blank action strings are treated as no entry at all.
fn de_action<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Action>, D::Error> {
    let s = Option::<String>::deserialize(d)?;
    Ok(s.and_then(|s| s.parse().ok()))
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerRecord {
    pub actions: BTreeMap<Segment, ActionEntry>,
    pub posted_sb: Currency,
    pub posted_bb: Currency,
    pub posted_ante: Currency,
    pub forced_all_in_preflop: bool,
    pub forced_all_in_amount: Currency,
    pub cards: [Option<Card>; 2],
}

impl PlayerRecord {
    pub fn entry(&self, segment: Segment) -> Option<&ActionEntry> {
        self.actions.get(&segment)
    }

    pub fn entry_mut(&mut self, segment: Segment) -> &mut ActionEntry {
        self.actions.entry(segment).or_default()
    }

    pub fn action(&self, segment: Segment) -> Option<Action> {
        self.entry(segment).and_then(|e| e.action)
    }

    pub fn record(&mut self, segment: Segment, action: Action) -> &mut Self {
        self.entry_mut(segment).action = Some(action);
        self
    }

    pub fn record_amount(
        &mut self,
        segment: Segment,
        action: Action,
        amount: f64,
        unit: Unit,
    ) -> &mut Self {
        self.actions
            .insert(segment, ActionEntry::with_amount(action, amount, unit));
        self
    }

    /// Chips posted before any action, ante included.
    pub fn posted_total(&self) -> Currency {
        self.posted_sb + self.posted_bb + self.posted_ante
    }

    /// The SB, BB and ante that a `stack` actually covers. Blinds come out first.
    pub fn posts_covered(&self, stack: Currency) -> (Currency, Currency, Currency) {
        let mut left = stack.max(0);
        let mut take = |posted: Currency| {
            let t = posted.clamp(0, left);
            left -= t;
            t
        };
        let sb = take(self.posted_sb);
        let bb = take(self.posted_bb);
        let ante = take(self.posted_ante);
        (sb, bb, ante)
    }

    fn never_acted_preflop(&self) -> bool {
        self.entry(Segment::PREFLOP_BASE)
            .and_then(ActionEntry::taken)
            .is_none()
    }

    /// Out of the hand by the time `segment` starts. A player who never acted in preflop base
    /// counts as folded once betting has moved past it.
    pub fn folded_before(&self, segment: Segment) -> bool {
        if !segment.is_preflop_base() && self.never_acted_preflop() {
            return true;
        }
        self.actions
            .range(..segment)
            .any(|(_, e)| e.action == Some(Action::Fold))
    }

    /// Like `folded_before`, but a fold in `segment` itself counts too.
    pub fn folded_through(&self, segment: Segment) -> bool {
        self.folded_before(segment) || self.action(segment) == Some(Action::Fold)
    }

    /// Whether the player has given up their claim on the pot by the end of `segment`. When
    /// settling, silence in preflop base is a fold even while preflop base is current.
    pub fn out_of_pot(&self, segment: Segment) -> bool {
        self.never_acted_preflop() || self.folded_through(segment)
    }

    /// Whether the player has gone all in at any point up to and including `segment`. Blinds
    /// that took the whole stack count from preflop base on.
    pub fn all_in_through(&self, segment: Segment) -> bool {
        self.forced_all_in_preflop
            || self
                .actions
                .range(..=segment)
                .any(|(_, e)| e.action == Some(Action::AllIn))
    }

    pub fn has_cards(&self) -> bool {
        self.cards.iter().all(Option::is_some)
    }
}

/// A player with nothing recorded reads as an empty record.
pub(crate) fn record_of(data: &PlayerData, id: PlayerId) -> Cow<'_, PlayerRecord> {
    data.get(&id).map(Cow::Borrowed).unwrap_or_default()
}

/// The last thing a player did before the current segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousRound {
    pub stage_name: String,
    pub level_name: String,
    pub action: String,
    pub amount: Currency,
    pub segment: Segment,
}

pub fn previous_round(
    record: &PlayerRecord,
    segment: Segment,
    default_unit: Unit,
) -> Option<PreviousRound> {
    segment.sources().into_iter().find_map(|seg| {
        let entry = record.entry(seg)?;
        let action = entry.taken()?;
        Some(PreviousRound {
            stage_name: seg.stage.name().to_uppercase(),
            level_name: seg.level.title().to_string(),
            action: action.title().to_string(),
            amount: entry.chips(default_unit),
            segment: seg,
        })
    })
}

/// Levels that have at least one recorded action on a street.
pub fn visible_levels(player_data: &PlayerData, stage: Stage) -> Vec<Level> {
    crate::segment::ALL_LEVELS
        .into_iter()
        .filter(|level| {
            *level == Level::Base
                || player_data
                    .values()
                    .any(|r| r.action(Segment::new(stage, *level)).is_some())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOP: Segment = Segment::new(Stage::Flop, Level::Base);
    const FLOP_MORE: Segment = Segment::new(Stage::Flop, Level::More);
    const TURN: Segment = Segment::new(Stage::Turn, Level::Base);

    #[test]
    fn action_strings() {
        assert_eq!("all-in".parse::<Action>().unwrap(), Action::AllIn);
        assert_eq!("No Action".parse::<Action>().unwrap(), Action::NoAction);
        assert!("limp".parse::<Action>().is_err());
        assert_eq!(Action::AllIn.to_string(), "all-in");
        assert_eq!(Action::AllIn.title(), "All-in");
        assert!(Action::Call.is_wager());
        assert!(!Action::Check.is_wager());
    }

    #[test]
    fn fold_is_terminal() {
        let mut r = PlayerRecord::default();
        r.record(Segment::PREFLOP_BASE, Action::Call)
            .record(FLOP, Action::Fold);
        assert!(!r.folded_before(FLOP));
        assert!(r.folded_through(FLOP));
        assert!(r.folded_before(FLOP_MORE));
        assert!(r.folded_before(TURN));
    }

    #[test]
    fn silent_preflop_is_a_fold_later() {
        let r = PlayerRecord::default();
        assert!(!r.folded_before(Segment::PREFLOP_BASE));
        assert!(!r.folded_through(Segment::PREFLOP_BASE));
        assert!(r.folded_before(Segment::new(Stage::Preflop, Level::More)));
        assert!(r.folded_before(FLOP));
        assert!(r.out_of_pot(Segment::PREFLOP_BASE));
    }

    #[test]
    fn all_in_scan() {
        let mut r = PlayerRecord::default();
        r.record(Segment::PREFLOP_BASE, Action::Call)
            .record(FLOP_MORE, Action::AllIn);
        assert!(!r.all_in_through(FLOP));
        assert!(r.all_in_through(FLOP_MORE));
        assert!(r.all_in_through(TURN));

        let forced = PlayerRecord {
            forced_all_in_preflop: true,
            ..PlayerRecord::default()
        };
        assert!(forced.all_in_through(Segment::PREFLOP_BASE));
        assert!(forced.all_in_through(FLOP));
    }

    #[test]
    fn chips_from_entry() {
        let e = ActionEntry::with_amount(Action::Raise, 2.5, Unit::K);
        assert_eq!(e.chips(Unit::Actual), 2500);
        let bare = ActionEntry {
            action: Some(Action::Bet),
            amount: Some(3.0),
            unit: None,
        };
        assert_eq!(bare.chips(Unit::Actual), 3);
        assert_eq!(bare.chips(Unit::K), 3000);
        assert_eq!(bare.chips_guessing_unit(), 3000);
        assert_eq!(ActionEntry::new(Action::Check).chips(Unit::K), 0);
    }

    #[test]
    fn last_action_before() {
        let mut r = PlayerRecord::default();
        r.record_amount(Segment::PREFLOP_BASE, Action::Raise, 3.0, Unit::K)
            .record(Segment::new(Stage::Preflop, Level::More), Action::NoAction);
        let prev = previous_round(&r, FLOP, Unit::K).unwrap();
        assert_eq!(prev.stage_name, "PREFLOP");
        assert_eq!(prev.level_name, "BASE");
        assert_eq!(prev.action, "Raise");
        assert_eq!(prev.amount, 3000);
        assert_eq!(prev.segment, Segment::PREFLOP_BASE);
        assert_eq!(previous_round(&r, Segment::PREFLOP_BASE, Unit::K), None);
    }

    #[test]
    fn record_from_json() {
        let r: PlayerRecord = serde_json::from_str(
            r#"{
                "actions": {
                    "preflop_base": {"action": "raise", "amount": "2.5", "unit": "K"},
                    "flop_base": {"action": "", "amount": ""}
                },
                "posted_sb": 500
            }"#,
        )
        .unwrap();
        assert_eq!(r.action(Segment::PREFLOP_BASE), Some(Action::Raise));
        assert_eq!(r.entry(Segment::PREFLOP_BASE).unwrap().chips(Unit::K), 2500);
        assert_eq!(r.action(FLOP), None);
        assert_eq!(r.entry(FLOP).unwrap().amount, None);
        assert_eq!(r.posted_sb, 500);
        assert_eq!(r.posted_bb, 0);
    }

    #[test]
    fn levels_with_actions() {
        let mut data = PlayerData::new();
        data.entry(1)
            .or_default()
            .record(Segment::new(Stage::Flop, Level::More2), Action::Call);
        assert_eq!(
            visible_levels(&data, Stage::Flop),
            vec![Level::Base, Level::More2]
        );
        assert_eq!(visible_levels(&data, Stage::Turn), vec![Level::Base]);
    }
}
