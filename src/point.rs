//! Momentum history records: points, game markers and set markers.

use serde::{Deserialize, Serialize};

use crate::types::{PointSeq, SetNumber, Side};

/// One recorded point in the cumulative score-difference series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// Sequence number of the point (0 is the seed).
    pub sequence: PointSeq,
    /// Player points won minus opponent points won, after this point.
    pub score_difference: i64,
}

impl Point {
    /// The `{0, 0}` point every history starts with.
    pub const SEED: Point = Point {
        sequence: 0,
        score_difference: 0,
    };
}

/// Annotation recorded when a game concludes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMarker {
    /// Point sequence at the moment of the game win.
    pub sequence: PointSeq,
    /// Game tally after the win, `"player:opponent"`.
    pub game_score: String,
}

/// Annotation recorded when a set concludes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetMarker {
    /// Point sequence at the moment of the set win.
    pub sequence: PointSeq,
    /// One-based number of the finished set.
    pub set_number: SetNumber,
    /// Final game tally of the set, `"player:opponent"`.
    pub set_score: String,
    /// Side that took the set.
    pub winner: Side,
}
