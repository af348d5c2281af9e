//! Board geometry configuration and point addressing.

use std::fmt;

/// Which geometric axes bond holes together into one rail.
///
/// A standard breadboard terminal strip bonds per column within a segment
/// (`segment + repetition + column`); a power rail bonds a whole row of a
/// repetition (`segment + repetition + row`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupRule {
    pub segment: bool,
    pub repetition: bool,
    pub column: bool,
    pub row: bool,
}

impl GroupRule {
    /// Terminal-strip bonding: each column of each segment is one rail.
    pub const TERMINAL_STRIP: GroupRule = GroupRule {
        segment: true,
        repetition: true,
        column: true,
        row: false,
    };

    /// Power-rail bonding: each row of each repetition is one rail.
    pub const POWER_RAIL: GroupRule = GroupRule {
        segment: true,
        repetition: true,
        column: false,
        row: true,
    };
}

/// Geometry of one hole grid on a board.
///
/// Every board has two segments (separated by the DIP support channel); each
/// segment repeats `repetitions` blocks of `columns` x `rows` holes.
#[derive(Debug, Clone, Copy)]
pub struct BoardConfig {
    /// Hole columns per segment block.
    pub columns: usize,
    /// Hole rows per column.
    pub rows: usize,
    /// Inline repetitions of the block within a segment.
    pub repetitions: usize,
    /// Bonding rule deciding which holes share a rail.
    pub rule: GroupRule,
}

/// Number of segments on every board (above and below the DIP channel).
pub const SEGMENTS: usize = 2;

impl BoardConfig {
    /// A full-size terminal-strip grid: 30 columns of 5 holes per segment.
    pub fn terminal_strip() -> Self {
        Self {
            columns: 30,
            rows: 5,
            repetitions: 1,
            rule: GroupRule::TERMINAL_STRIP,
        }
    }

    /// A power-rail grid: two bonded rows per segment.
    pub fn power_rail() -> Self {
        Self {
            columns: 25,
            rows: 2,
            repetitions: 1,
            rule: GroupRule::POWER_RAIL,
        }
    }

    /// Total number of holes in this grid.
    pub fn hole_count(&self) -> usize {
        SEGMENTS * self.repetitions * self.columns * self.rows
    }
}

/// Which hole grid a point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointGroup {
    /// The main terminal-strip grid.
    Main,
    /// The power-rail grid.
    PowerRail,
    /// A power-supply terminal (not on a board grid).
    Supply,
}

impl fmt::Display for PointGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointGroup::Main => write!(f, "main"),
            PointGroup::PowerRail => write!(f, "power"),
            PointGroup::Supply => write!(f, "supply"),
        }
    }
}

/// Full geometric address of one hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Discriminator {
    pub segment: usize,
    pub repetition: usize,
    pub column: usize,
    pub row: usize,
    pub group: PointGroup,
}

impl Discriminator {
    /// Address a hole on the main grid.
    pub fn main(segment: usize, repetition: usize, column: usize, row: usize) -> Self {
        Self {
            segment,
            repetition,
            column,
            row,
            group: PointGroup::Main,
        }
    }

    /// Address a hole on the power-rail grid.
    pub fn power(segment: usize, repetition: usize, column: usize, row: usize) -> Self {
        Self {
            segment,
            repetition,
            column,
            row,
            group: PointGroup::PowerRail,
        }
    }
}

/// Key identifying one bonded rail: the discriminator axes selected by the
/// group rule, `None` on the axes the rule ignores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RailKey {
    pub segment: Option<usize>,
    pub repetition: Option<usize>,
    pub column: Option<usize>,
    pub row: Option<usize>,
}

impl RailKey {
    /// Project a hole address onto its rail under `rule`.
    pub fn from_discriminator(d: &Discriminator, rule: &GroupRule) -> Self {
        Self {
            segment: rule.segment.then_some(d.segment),
            repetition: rule.repetition.then_some(d.repetition),
            column: rule.column.then_some(d.column),
            row: rule.row.then_some(d.row),
        }
    }
}
