use crate::action::Action;
use crate::segment::Segment;
use crate::{Currency, PlayerId, SeqNum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogItem {
    /// Segment and total chips put in during it
    SegmentProcessed(Segment, Currency),
    /// Nobody acted in this segment
    SegmentSkipped(Segment),
    /// Player, and their total for the segment once all in
    AllIn(Segment, PlayerId, Currency),
    /// Player, what they needed to be in for, and what they had
    ForcedAllIn(Segment, PlayerId, Currency, Currency),
    MissingAmount(Segment, PlayerId, Action),
    AutoFolded(Segment, PlayerId),
    DeadMoney(Currency),
    /// Total pot and number of pots it was split into
    PotsBuilt(Currency, usize),
    Eliminated(String),
    SeatsAssigned(usize),
}

impl std::fmt::Display for LogItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogItem::SegmentProcessed(seg, total) => {
                write!(f, "{seg} processed, {total} put in")
            }
            LogItem::SegmentSkipped(seg) => write!(f, "{seg} skipped, no actions recorded"),
            LogItem::AllIn(seg, player_id, total) => {
                write!(f, "Player {player_id} all in for {total} in {seg}")
            }
            LogItem::ForcedAllIn(seg, player_id, required, available) => write!(
                f,
                "Player {player_id} needed {required} in {seg} but only had {available}; now all in"
            ),
            LogItem::MissingAmount(seg, player_id, action) => {
                write!(f, "Player {player_id} {action} in {seg} has no amount; skipped")
            }
            LogItem::AutoFolded(seg, player_id) => {
                write!(f, "Player {player_id} never acted in {seg}; folded")
            }
            LogItem::DeadMoney(total) => write!(f, "Dead money is {total}"),
            LogItem::PotsBuilt(total, count) => write!(f, "{count} pot(s) built, {total} total"),
            LogItem::Eliminated(name) => write!(f, "{name} busted on the button and is out"),
            LogItem::SeatsAssigned(count) => write!(f, "Seats assigned for {count} players"),
        }
    }
}

/// Everything the engine did over one hand, in order. A log carried from one request into
/// the next keeps its numbering, so a caller can pick out just what is new with [`Log::since`].
#[derive(Debug, PartialEq, Eq, Default, Clone, Serialize, Deserialize)]
pub struct Log {
    entries: Vec<(SeqNum, LogItem)>,
}

impl Log {
    /// Number of the newest entry, 0 for an empty log.
    pub fn last_seq(&self) -> SeqNum {
        self.entries.last().map_or(0, |(seq, _)| *seq)
    }

    pub fn push(&mut self, item: LogItem) {
        let seq = self.last_seq() + 1;
        self.entries.push((seq, item));
    }

    pub fn extend<I: IntoIterator<Item = LogItem>>(&mut self, iter: I) {
        let start = self.last_seq() + 1;
        self.entries.extend((start..).zip(iter));
    }

    /// Adds `other`'s items after this log's own, numbered on from here.
    pub fn append(&mut self, other: &Log) {
        self.extend(other.items().cloned());
    }

    pub fn items(&self) -> impl Iterator<Item = &LogItem> + '_ {
        self.entries.iter().map(|(_, item)| item)
    }

    /// Entries numbered after `seq`.
    pub fn since(&self, seq: SeqNum) -> &[(SeqNum, LogItem)] {
        let first = self.entries.partition_point(|(s, _)| *s <= seq);
        &self.entries[first..]
    }
}

impl From<Vec<LogItem>> for Log {
    fn from(items: Vec<LogItem>) -> Self {
        let mut log = Log::default();
        log.extend(items);
        log
    }
}
