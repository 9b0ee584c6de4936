//! Journal model for applied match actions.

use serde::{Deserialize, Serialize};

use crate::types::{GameTally, OpSeq, Side};

/// A user action that changed the match state.
///
/// Set wins promoted from a game win are not journaled separately; replaying
/// the [`MatchAction::GameWon`] re-derives them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchAction {
    /// A rally went to `side`.
    PointWon {
        /// Point winner.
        side: Side,
    },
    /// A game went to `side`.
    GameWon {
        /// Game winner.
        side: Side,
    },
    /// A set was awarded directly to `side`.
    SetWon {
        /// Set winner.
        side: Side,
        /// Game tally the set finished on.
        final_games: GameTally,
    },
    /// `party` retired from the match.
    Withdrew {
        /// Withdrawing side.
        party: Side,
    },
}

/// Journal row metadata plus action payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredOp {
    /// Monotonic operation sequence.
    pub seq: OpSeq,
    /// Operation timestamp in milliseconds.
    pub ts_ms: u64,
    /// Applied action.
    pub action: MatchAction,
}
