//! Shared primitive IDs, sides and tallies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Monotonic point sequence number (0 is the seed point).
pub type PointSeq = u64;
/// Monotonic journal operation sequence number.
pub type OpSeq = u64;
/// One-based set number.
pub type SetNumber = u32;

/// One of the two sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The tracked player.
    Player,
    /// The player's opponent.
    Opponent,
}

impl Side {
    /// Returns the other side.
    pub fn other(self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    /// Score-difference delta for a point won by this side.
    pub fn delta(self) -> i64 {
        match self {
            Side::Player => 1,
            Side::Opponent => -1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Opponent => f.write_str("opponent"),
        }
    }
}

/// Per-side counter pair rendered as `"player:opponent"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameTally {
    /// Player count.
    pub player: u32,
    /// Opponent count.
    pub opponent: u32,
}

impl GameTally {
    /// Builds a tally from both counts.
    pub fn new(player: u32, opponent: u32) -> Self {
        Self { player, opponent }
    }

    /// Count for `side`.
    pub fn of(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player,
            Side::Opponent => self.opponent,
        }
    }

    /// Mutable count for `side`.
    pub fn of_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }

    /// Sum of both counts.
    pub fn total(&self) -> u32 {
        self.player + self.opponent
    }
}

impl fmt::Display for GameTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.player, self.opponent)
    }
}

/// Lifecycle state of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Actions are accepted.
    #[default]
    InProgress,
    /// Terminal; every mutating action is ignored.
    MatchOver,
}
