use crate::segment::{Segment, Stage};
use crate::{Currency, PlayerId};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type Chips = BTreeMap<PlayerId, Currency>;
pub type ContributedAmounts = BTreeMap<Segment, Chips>;
pub type SectionStacks = BTreeMap<Segment, SegmentStacks>;

/// Stacks around one segment: `current` going in, `updated` coming out.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SegmentStacks {
    pub initial: Chips,
    pub current: Chips,
    pub updated: Chips,
}

bitflags! {
    /// One bit per segment, in play order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ProcessedSections: u16 {
        const PREFLOP_BASE = 1 << 0;
        const PREFLOP_MORE = 1 << 1;
        const PREFLOP_MORE2 = 1 << 2;
        const FLOP_BASE = 1 << 3;
        const FLOP_MORE = 1 << 4;
        const FLOP_MORE2 = 1 << 5;
        const TURN_BASE = 1 << 6;
        const TURN_MORE = 1 << 7;
        const TURN_MORE2 = 1 << 8;
        const RIVER_BASE = 1 << 9;
        const RIVER_MORE = 1 << 10;
        const RIVER_MORE2 = 1 << 11;
    }
}

impl ProcessedSections {
    pub fn segment(segment: Segment) -> Self {
        Self::from_bits_truncate(1 << segment.index())
    }

    pub fn mark(&mut self, segment: Segment) {
        self.insert(Self::segment(segment));
    }

    pub fn is_processed(&self, segment: Segment) -> bool {
        self.contains(Self::segment(segment))
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        Segment::all().filter(move |s| self.is_processed(*s))
    }
}

/// Everything the engine has worked out for a hand so far. The caller keeps this between
/// calls and hands it back in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ledger {
    pub contributed: ContributedAmounts,
    pub stacks: SectionStacks,
    pub processed: ProcessedSections,
}

impl Ledger {
    pub fn contribution(&self, segment: Segment, player: PlayerId) -> Currency {
        self.contributed
            .get(&segment)
            .and_then(|m| m.get(&player))
            .copied()
            .unwrap_or_default()
    }

    pub fn updated_stack(&self, segment: Segment, player: PlayerId) -> Option<Currency> {
        self.stacks
            .get(&segment)
            .and_then(|s| s.updated.get(&player))
            .copied()
    }

    /// Stack after the most recent segment before `segment` that recorded one.
    pub fn carried_stack(&self, segment: Segment, player: PlayerId) -> Option<Currency> {
        segment
            .sources()
            .into_iter()
            .find_map(|s| self.updated_stack(s, player))
    }

    /// Sum over every segment of one street.
    pub fn street_total(&self, stage: Stage, player: PlayerId) -> Currency {
        self.contributed
            .iter()
            .filter(|(s, _)| s.stage == stage)
            .filter_map(|(_, m)| m.get(&player))
            .sum()
    }

    /// Sum over every segment of every street up to and including `stage`.
    pub fn hand_total(&self, through: Stage, player: PlayerId) -> Currency {
        self.contributed
            .iter()
            .filter(|(s, _)| s.stage <= through)
            .filter_map(|(_, m)| m.get(&player))
            .sum()
    }

    pub(crate) fn commit(&mut self, segment: Segment, stacks: SegmentStacks, contributed: Chips) {
        self.stacks.insert(segment, stacks);
        self.contributed.insert(segment, contributed);
        self.processed.mark(segment);
    }
}
