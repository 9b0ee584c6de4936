use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{
    config::TrackerConfig,
    op::{MatchAction, StoredOp},
    point::{GameMarker, Point, SetMarker},
    types::{GameTally, MatchStatus, OpSeq, PointSeq, SetNumber, Side},
};

/// Authoritative per-session match state.
///
/// Only [`MatchTracker`] mutates it; callers read it or take a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    /// Points recorded so far.
    pub point_sequence: PointSeq,
    /// Cumulative player-minus-opponent points.
    pub score_difference: i64,
    /// Games in the current set.
    pub games: GameTally,
    /// Sets won.
    pub sets: GameTally,
    /// One-based number of the set in play.
    pub current_set_number: SetNumber,
    /// Side that retired, if any.
    pub withdrawn: Option<Side>,
    /// Lifecycle state.
    pub status: MatchStatus,
    /// Score-difference series, starting with [`Point::SEED`].
    pub history: Vec<Point>,
    /// One marker per finished game.
    pub game_markers: Vec<GameMarker>,
    /// One marker per finished set.
    pub set_markers: Vec<SetMarker>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self {
            point_sequence: 0,
            score_difference: 0,
            games: GameTally::default(),
            sets: GameTally::default(),
            current_set_number: 1,
            withdrawn: None,
            status: MatchStatus::InProgress,
            history: vec![Point::SEED],
            game_markers: Vec::new(),
            set_markers: Vec::new(),
        }
    }
}

/// Who the match went to, as far as the state tells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeWinner {
    /// Player took the match.
    Player,
    /// Opponent took the match.
    Opponent,
    /// Max sets reached level on sets.
    Draw,
    /// Match still in progress.
    None,
}

impl From<Side> for OutcomeWinner {
    fn from(value: Side) -> Self {
        match value {
            Side::Player => Self::Player,
            Side::Opponent => Self::Opponent,
        }
    }
}

/// Why the match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeReason {
    /// Decided on sets won.
    SetsWon,
    /// One side retired.
    Withdrawal,
    /// Max sets reached with equal set counts.
    MaxSetsDraw,
}

/// Derived result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Winner, draw, or none while in progress.
    pub winner: OutcomeWinner,
    /// Present once the match is over.
    pub reason: Option<OutcomeReason>,
}

impl MatchOutcome {
    /// Outcome of a match still being played.
    pub const PENDING: MatchOutcome = MatchOutcome {
        winner: OutcomeWinner::None,
        reason: None,
    };
}

/// Match state machine: applies point, game, set and withdrawal actions.
///
/// Once the match is over every mutating call is ignored and returns `None`.
/// Applied actions are journaled and can be drained with
/// [`MatchTracker::drain_pending_ops`] or fed back through
/// [`MatchTracker::replay`].
#[derive(Debug)]
pub struct MatchTracker {
    config: TrackerConfig,
    state: MatchState,
    pending_ops: Vec<StoredOp>,
    next_op_seq: OpSeq,
}

impl Default for MatchTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchTracker {
    /// Tracker with default rules and names.
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    /// Fresh match under `config`. Call [`TrackerConfig::validate`] first for untrusted input.
    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            config,
            state: MatchState::default(),
            pending_ops: Vec::new(),
            next_op_seq: 1,
        }
    }

    /// Rebuilds a tracker by re-applying a journal. Ops that would be ignored
    /// by the rebuilt state are skipped.
    pub fn replay(config: TrackerConfig, ops: impl IntoIterator<Item = StoredOp>) -> Self {
        let mut tracker = Self::with_config(config);
        for stored in ops {
            tracker.apply_replayed_op(stored);
        }
        tracker
    }

    /// Applies a journaled op, keeping its sequence. Returns false if ignored.
    pub fn apply_replayed_op(&mut self, stored: StoredOp) -> bool {
        let applied = self.apply_action(stored.action);
        if applied {
            self.bump_next_seq_from(stored.seq);
        }
        applied
    }

    /// Applies any [`MatchAction`] as if it came from the matching method.
    pub fn apply(&mut self, action: MatchAction) -> Option<StoredOp> {
        if !self.apply_action(action) {
            return None;
        }
        Some(self.journal(action))
    }

    /// Moves the score difference one point toward `winner`.
    pub fn record_point(&mut self, winner: Side) -> Option<StoredOp> {
        self.apply(MatchAction::PointWon { side: winner })
    }

    /// Records a game and promotes it to a set win when the rules say so.
    pub fn record_game_win(&mut self, winner: Side) -> Option<StoredOp> {
        self.apply(MatchAction::GameWon { side: winner })
    }

    /// Awards the current set to `winner` on `final_games` and resets the game tally.
    pub fn record_set_win(&mut self, winner: Side, final_games: GameTally) -> Option<StoredOp> {
        self.apply(MatchAction::SetWon {
            side: winner,
            final_games,
        })
    }

    /// Ends the match in favour of the side that did not withdraw.
    pub fn withdraw(&mut self, party: Side) -> Option<StoredOp> {
        self.apply(MatchAction::Withdrew { party })
    }

    /// Derives the outcome from the current state without mutating it.
    pub fn compute_match_outcome(&self) -> MatchOutcome {
        if let Some(party) = self.state.withdrawn {
            return MatchOutcome {
                winner: party.other().into(),
                reason: Some(OutcomeReason::Withdrawal),
            };
        }

        if self.state.status == MatchStatus::InProgress {
            return MatchOutcome::PENDING;
        }

        let sets = self.state.sets;
        if sets.player == sets.opponent {
            MatchOutcome {
                winner: OutcomeWinner::Draw,
                reason: Some(OutcomeReason::MaxSetsDraw),
            }
        } else {
            let winner = if sets.player > sets.opponent {
                Side::Player
            } else {
                Side::Opponent
            };
            MatchOutcome {
                winner: winner.into(),
                reason: Some(OutcomeReason::SetsWon),
            }
        }
    }

    /// Current state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Owned copy of the state.
    pub fn export_snapshot(&self) -> MatchState {
        self.state.clone()
    }

    /// Configuration the tracker was built with.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// True once the match has concluded by sets, draw or withdrawal.
    pub fn is_over(&self) -> bool {
        self.state.status == MatchStatus::MatchOver
    }

    /// Point history, seed included.
    pub fn history(&self) -> &[Point] {
        &self.state.history
    }

    /// One marker per recorded game.
    pub fn game_markers(&self) -> &[GameMarker] {
        &self.state.game_markers
    }

    /// One marker per completed set.
    pub fn set_markers(&self) -> &[SetMarker] {
        &self.state.set_markers
    }

    /// History without the seed point.
    pub fn exportable_points(&self) -> Vec<Point> {
        self.state
            .history
            .iter()
            .filter(|p| p.sequence > 0)
            .copied()
            .collect()
    }

    /// Configured display name for `side`.
    pub fn name_of(&self, side: Side) -> &str {
        match side {
            Side::Player => &self.config.players.player,
            Side::Opponent => &self.config.players.opponent,
        }
    }

    /// `"Set 2 | Sets 1:0 | Games 3:2 | Diff +4"`.
    pub fn score_line(&self) -> String {
        format!(
            "Set {} | Sets {} | Games {} | Diff {:+}",
            self.state.current_set_number,
            self.state.sets,
            self.state.games,
            self.state.score_difference
        )
    }

    /// `"After N points"`, singular for one.
    pub fn points_label(&self) -> String {
        match self.state.point_sequence {
            1 => "After 1 point".to_string(),
            n => format!("After {n} points"),
        }
    }

    /// Human readable result, `None` while the match is in progress.
    pub fn outcome_message(&self) -> Option<String> {
        let outcome = self.compute_match_outcome();
        let reason = outcome.reason?;
        let sets = self.state.sets;

        let message = match (outcome.winner, reason) {
            (OutcomeWinner::Draw, _) => format!("Match drawn on sets {sets}"),
            (winner, OutcomeReason::Withdrawal) => {
                let party = self.state.withdrawn.unwrap_or(Side::Player);
                format!(
                    "{} wins by withdrawal ({} withdrew)",
                    self.winner_name(winner),
                    self.name_of(party)
                )
            }
            (winner, _) => format!("{} wins the match {sets}", self.winner_name(winner)),
        };
        Some(message)
    }

    /// Takes the journal entries applied since the last drain.
    pub fn drain_pending_ops(&mut self) -> Vec<StoredOp> {
        std::mem::take(&mut self.pending_ops)
    }

    /// Sequence of the newest journal entry, `0` before any.
    pub fn latest_op_seq(&self) -> OpSeq {
        self.next_op_seq.saturating_sub(1)
    }

    fn winner_name(&self, winner: OutcomeWinner) -> &str {
        match winner {
            OutcomeWinner::Player => self.name_of(Side::Player),
            OutcomeWinner::Opponent => self.name_of(Side::Opponent),
            OutcomeWinner::Draw | OutcomeWinner::None => "",
        }
    }

    fn apply_action(&mut self, action: MatchAction) -> bool {
        if self.is_over() {
            debug!(?action, "match over, ignoring action");
            return false;
        }

        match action {
            MatchAction::PointWon { side } => self.apply_point(side),
            MatchAction::GameWon { side } => self.apply_game_win(side),
            MatchAction::SetWon { side, final_games } => self.apply_set_win(side, final_games),
            MatchAction::Withdrew { party } => {
                if !self.config.allow_withdrawal {
                    debug!(%party, "withdrawal disabled, ignoring");
                    return false;
                }
                self.apply_withdrawal(party);
            }
        }
        true
    }

    fn apply_point(&mut self, winner: Side) {
        self.state.point_sequence += 1;
        self.state.score_difference += winner.delta();
        self.state.history.push(Point {
            sequence: self.state.point_sequence,
            score_difference: self.state.score_difference,
        });
        debug!(
            %winner,
            sequence = self.state.point_sequence,
            score_difference = self.state.score_difference,
            "point recorded"
        );
    }

    #[instrument(skip(self), level = "debug")]
    fn apply_game_win(&mut self, winner: Side) {
        *self.state.games.of_mut(winner) += 1;
        let games = self.state.games;
        self.state.game_markers.push(GameMarker {
            sequence: self.state.point_sequence,
            game_score: games.to_string(),
        });
        debug!(game_score = %games, "game recorded");

        if self.config.rules.wins_set(games, winner) {
            self.apply_set_win(winner, games);
        }
    }

    #[instrument(skip(self), level = "debug")]
    fn apply_set_win(&mut self, winner: Side, final_games: GameTally) {
        *self.state.sets.of_mut(winner) += 1;
        self.state.set_markers.push(SetMarker {
            sequence: self.state.point_sequence,
            set_number: self.state.current_set_number,
            set_score: final_games.to_string(),
            winner,
        });
        self.state.games = GameTally::default();

        let rules = self.config.rules;
        let reached_target = self.state.sets.of(winner) >= rules.sets_to_win;
        let out_of_sets = self.state.current_set_number + 1 > rules.max_sets;

        info!(
            set_number = self.state.current_set_number,
            set_score = %final_games,
            sets = %self.state.sets,
            "set won"
        );

        if reached_target || out_of_sets {
            self.state.status = MatchStatus::MatchOver;
            info!(sets = %self.state.sets, "match over");
        } else {
            self.state.current_set_number += 1;
        }
    }

    fn apply_withdrawal(&mut self, party: Side) {
        self.state.withdrawn = Some(party);
        *self.state.sets.of_mut(party.other()) = self.config.rules.sets_to_win;
        self.state.status = MatchStatus::MatchOver;
        info!(%party, "withdrawal, match over");
    }

    fn journal(&mut self, action: MatchAction) -> StoredOp {
        let stored = StoredOp {
            seq: self.take_next_op_seq(),
            ts_ms: now_ms(),
            action,
        };
        self.pending_ops.push(stored.clone());
        stored
    }

    fn take_next_op_seq(&mut self) -> OpSeq {
        let seq = self.next_op_seq;
        self.next_op_seq += 1;
        seq
    }

    fn bump_next_seq_from(&mut self, seq: OpSeq) {
        self.next_op_seq = self.next_op_seq.max(seq.saturating_add(1));
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
