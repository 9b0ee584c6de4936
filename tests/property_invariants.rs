use proptest::prelude::*;

use tennislog::{
    chart::series::{enrich, split, ChartPoint},
    config::TrackerConfig,
    core::state::MatchTracker,
    op::MatchAction,
    types::{GameTally, MatchStatus, Side},
};

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Player), Just(Side::Opponent)]
}

fn action_strategy() -> impl Strategy<Value = MatchAction> {
    prop_oneof![
        8 => side_strategy().prop_map(|side| MatchAction::PointWon { side }),
        4 => side_strategy().prop_map(|side| MatchAction::GameWon { side }),
        1 => (side_strategy(), 0u32..8, 0u32..8).prop_map(|(side, p, o)| MatchAction::SetWon {
            side,
            final_games: GameTally::new(p, o),
        }),
        1 => side_strategy().prop_map(|party| MatchAction::Withdrew { party }),
    ]
}

fn series_strategy() -> impl Strategy<Value = Vec<ChartPoint>> {
    prop::collection::vec(-6i64..=6, 0..40).prop_map(|values| {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| ChartPoint {
                sequence: i as f64,
                value: v as f64,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn points_only_track_count_and_difference(sides in prop::collection::vec(side_strategy(), 0..300)) {
        let mut tracker = MatchTracker::new();
        for side in &sides {
            prop_assert!(tracker.record_point(*side).is_some());
        }

        let player = sides.iter().filter(|s| **s == Side::Player).count() as i64;
        let opponent = sides.len() as i64 - player;
        prop_assert_eq!(tracker.state().point_sequence, sides.len() as u64);
        prop_assert_eq!(tracker.state().score_difference, player - opponent);
        prop_assert_eq!(tracker.history().len(), sides.len() + 1);
    }

    #[test]
    fn random_actions_preserve_match_invariants(actions in prop::collection::vec(action_strategy(), 1..250)) {
        let mut tracker = MatchTracker::new();
        let max_sets = tracker.config().rules.max_sets;

        for action in actions {
            let before = tracker.export_snapshot();
            let applied = tracker.apply(action);
            let after = tracker.state();

            if before.status == MatchStatus::MatchOver {
                prop_assert!(applied.is_none());
                prop_assert_eq!(&before, after);
                continue;
            }

            prop_assert!(after.current_set_number >= before.current_set_number);
            prop_assert!(after.point_sequence >= before.point_sequence);
            prop_assert!(after.point_sequence - before.point_sequence <= 1);
            prop_assert!(after.history.windows(2).all(|w| w[0].sequence + 1 == w[1].sequence));
            if after.withdrawn.is_none() {
                prop_assert!(after.sets.total() <= max_sets);
            }
            if after.set_markers.len() > before.set_markers.len() && after.status == MatchStatus::InProgress {
                prop_assert_eq!(after.games, GameTally::default());
                prop_assert_eq!(after.current_set_number, before.current_set_number + 1);
            }
        }

        let ops = tracker.drain_pending_ops();
        let replayed = MatchTracker::replay(TrackerConfig::default(), ops);
        prop_assert_eq!(replayed.state(), tracker.state());
    }

    #[test]
    fn enrichment_is_idempotent(points in series_strategy()) {
        let once = enrich(&points);
        let twice = enrich(&once);
        prop_assert_eq!(&once, &twice);
    }

    #[test]
    fn enriched_series_has_no_strict_sign_changes(points in series_strategy()) {
        let enriched = enrich(&points);
        prop_assert!(enriched.windows(2).all(|w| w[0].sequence < w[1].sequence));
        prop_assert!(enriched.windows(2).all(|w| w[0].value * w[1].value >= 0.0));

        let (positive, negative) = split(&enriched);
        prop_assert_eq!(positive.len(), enriched.len());
        prop_assert_eq!(negative.len(), enriched.len());
        for ((pos, neg), src) in positive.iter().zip(&negative).zip(&enriched) {
            prop_assert!(pos.value.is_some() || neg.value.is_some());
            if src.value == 0.0 {
                prop_assert_eq!(pos.value, Some(0.0));
                prop_assert_eq!(neg.value, Some(0.0));
            }
        }
    }
}
