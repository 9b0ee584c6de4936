//! Match scoring rules and the authoritative match state machine.

/// Scoring constants and the set-win predicate.
pub mod rules;
/// Match state, tracker transitions and journal.
pub mod state;
