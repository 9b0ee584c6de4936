//! Runtime event stream payloads.

use crate::{
    core::state::MatchOutcome,
    types::{GameTally, PointSeq, SetNumber, Side},
};

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    /// A point was appended to the history.
    PointRecorded {
        /// New point sequence.
        sequence: PointSeq,
        /// Cumulative difference after the point.
        score_difference: i64,
    },
    /// A game was recorded.
    GameWon {
        /// Game winner.
        side: Side,
        /// Game marker text, `"p:o"`.
        game_score: String,
    },
    /// A set concluded, directly or promoted from a game win.
    SetWon {
        /// Finished set.
        set_number: SetNumber,
        /// Set winner.
        side: Side,
        /// Final game tally, `"p:o"`.
        set_score: String,
        /// Sets after this one.
        sets: GameTally,
    },
    /// A side retired.
    Withdrawn {
        /// Withdrawing side.
        party: Side,
    },
    /// The match reached its terminal state.
    MatchOver {
        /// Final outcome.
        outcome: MatchOutcome,
    },
    /// An export finished.
    ExportFinished {
        /// Whether it succeeded.
        success: bool,
    },
}
