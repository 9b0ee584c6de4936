//! In-memory tennis match tracking with a derived momentum chart.
//!
//! # Examples
//!
//! Scoring with [`core::state::MatchTracker`]:
//! ```
//! use tennislog::{
//!     chart,
//!     core::state::{MatchTracker, OutcomeReason, OutcomeWinner},
//!     types::Side,
//! };
//!
//! let mut tracker = MatchTracker::new();
//! tracker.record_point(Side::Player);
//! tracker.record_point(Side::Opponent);
//! tracker.record_point(Side::Opponent);
//! assert_eq!(tracker.state().point_sequence, 3);
//! assert_eq!(tracker.state().score_difference, -1);
//!
//! let chart = chart::from_state(tracker.state());
//! assert_eq!(chart.positive.len(), chart.negative.len());
//!
//! tracker.withdraw(Side::Opponent);
//! let outcome = tracker.compute_match_outcome();
//! assert_eq!(outcome.winner, OutcomeWinner::Player);
//! assert_eq!(outcome.reason, Some(OutcomeReason::Withdrawal));
//! ```
//!
//! Runtime usage with the mock exporter:
//! ```no_run
//! use tennislog::{
//!     config::TrackerConfig,
//!     core::state::MatchTracker,
//!     export::{ExportTarget, Exporter},
//!     runtime::handle::{spawn_tracker, RuntimeConfig},
//!     types::Side,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = TrackerConfig::from_file("tennislog.toml").expect("config");
//! let exporter = Exporter::mock(config.export);
//! let handle = spawn_tracker(MatchTracker::with_config(config), exporter, RuntimeConfig::default());
//! handle.record_point(Side::Player).await.expect("point");
//! let outcome = handle.export(ExportTarget::Sheet).await.expect("export");
//! assert!(outcome.success);
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Tracker configuration.
pub mod config;
/// Scoring rules and the match state machine.
pub mod core;
/// Momentum chart derivation.
pub mod chart;
/// Mock report export collaborator.
pub mod export;
/// Journal entries for applied actions.
pub mod op;
/// Point and marker records.
pub mod point;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Shared primitive types and enums.
pub mod types;
