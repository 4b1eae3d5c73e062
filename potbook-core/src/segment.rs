use enum_map::Enum;
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

pub const ALL_STAGES: [Stage; 4] = [Stage::Preflop, Stage::Flop, Stage::Turn, Stage::River];
pub const ALL_LEVELS: [Level; 3] = [Level::Base, Level::More, Level::More2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Stage {
    pub const fn name(&self) -> &'static str {
        match self {
            Stage::Preflop => "preflop",
            Stage::Flop => "flop",
            Stage::Turn => "turn",
            Stage::River => "river",
        }
    }

    pub const fn previous(&self) -> Option<Stage> {
        match self {
            Stage::Preflop => None,
            Stage::Flop => Some(Stage::Preflop),
            Stage::Turn => Some(Stage::Flop),
            Stage::River => Some(Stage::Turn),
        }
    }

    pub const fn is_preflop(&self) -> bool {
        matches!(self, Stage::Preflop)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_STAGES
            .into_iter()
            .find(|stage| stage.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown stage: {s}"))
    }
}

/// A betting reopening within one street. `More` and `More2` are the first and second times
/// action comes back around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Base,
    More,
    More2,
}

impl Level {
    pub const fn name(&self) -> &'static str {
        match self {
            Level::Base => "base",
            Level::More => "more",
            Level::More2 => "more2",
        }
    }

    /// Field-name suffix the level is known by in hand-entry forms.
    pub const fn suffix(&self) -> &'static str {
        match self {
            Level::Base => "",
            Level::More => "_moreAction",
            Level::More2 => "_moreAction2",
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Level::Base => "BASE",
            Level::More => "MORE ACTION 1",
            Level::More2 => "MORE ACTION 2",
        }
    }

    pub const fn previous(&self) -> Option<Level> {
        match self {
            Level::Base => None,
            Level::More => Some(Level::Base),
            Level::More2 => Some(Level::More),
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Level> {
        ALL_LEVELS.into_iter().find(|l| l.suffix() == suffix)
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_LEVELS
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown level: {s}"))
    }
}

/// One (stage, level) pair. Ordering follows play: every level of a street comes before the
/// next street.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Segment {
    pub stage: Stage,
    pub level: Level,
}

impl Segment {
    pub const PREFLOP_BASE: Segment = Segment::new(Stage::Preflop, Level::Base);

    pub const fn new(stage: Stage, level: Level) -> Self {
        Self { stage, level }
    }

    pub fn all() -> impl Iterator<Item = Segment> + Clone {
        ALL_STAGES
            .into_iter()
            .cartesian_product(ALL_LEVELS)
            .map(|(stage, level)| Segment::new(stage, level))
    }

    /// Every segment from preflop base through this one.
    pub fn up_to(self) -> impl Iterator<Item = Segment> {
        Segment::all().take_while(move |s| *s <= self)
    }

    pub fn index(&self) -> usize {
        self.stage.into_usize() * ALL_LEVELS.len() + self.level.into_usize()
    }

    pub fn is_preflop_base(&self) -> bool {
        *self == Segment::PREFLOP_BASE
    }

    pub fn previous(&self) -> Option<Segment> {
        match self.level.previous() {
            Some(level) => Some(Segment::new(self.stage, level)),
            None => self
                .stage
                .previous()
                .map(|stage| Segment::new(stage, Level::More2)),
        }
    }

    /// Earlier segments, most recent first: where a carried-forward value is looked for when
    /// this segment has none of its own.
    pub fn sources(&self) -> Vec<Segment> {
        let mut v: Vec<Segment> = Segment::all().take_while(|s| s < self).collect();
        v.reverse();
        v
    }

    /// Earlier levels of the same street.
    pub fn earlier_levels(&self) -> impl Iterator<Item = Segment> + '_ {
        ALL_LEVELS
            .into_iter()
            .take_while(move |l| *l < self.level)
            .map(move |l| Segment::new(self.stage, l))
    }

    pub fn key(&self) -> String {
        format!("{}_{}", self.stage, self.level)
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.stage, self.level)
    }
}

impl FromStr for Segment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (stage, level) = s
            .split_once('_')
            .ok_or_else(|| format!("Bad segment key: {s}"))?;
        Ok(Segment::new(stage.parse()?, level.parse()?))
    }
}

impl Serialize for Segment {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Segment {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
