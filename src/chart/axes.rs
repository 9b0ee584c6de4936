use serde::{Deserialize, Serialize};

use crate::{point::Point, types::PointSeq};

/// Smallest vertical span forced on a narrow series.
pub const MIN_Y_SPAN: f64 = 2.0;
/// Histories whose last sequence is at most this get a tick per point.
pub const DENSE_TICK_LIMIT: PointSeq = 10;
/// Tick count aimed for on longer histories.
pub const TARGET_TICKS: PointSeq = 10;

/// Vertical axis range handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YDomain {
    /// Renderer picks the range.
    Auto,
    /// Fixed inclusive range.
    Fixed {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}

/// Y domain for `points`.
///
/// Ranges narrower than [`MIN_Y_SPAN`] are widened to exactly that span
/// around their midpoint; anything wider is left to the renderer.
pub fn y_domain(points: &[Point]) -> YDomain {
    let mut values = points.iter().map(|p| p.score_difference);
    let Some(first) = values.next() else {
        return YDomain::Auto;
    };
    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let (min, max) = (min as f64, max as f64);

    if max - min < MIN_Y_SPAN {
        let center = (min + max) / 2.0;
        YDomain::Fixed {
            min: center - MIN_Y_SPAN / 2.0,
            max: center + MIN_Y_SPAN / 2.0,
        }
    } else {
        YDomain::Auto
    }
}

/// Tick positions on the sequence axis, ascending and unique.
pub fn x_ticks(points: &[Point]) -> Vec<PointSeq> {
    let Some(max) = points.iter().map(|p| p.sequence).max() else {
        return Vec::new();
    };

    if max <= DENSE_TICK_LIMIT {
        return (0..=max).collect();
    }

    let step = (max / TARGET_TICKS).max(1);
    let mut ticks: Vec<PointSeq> = (0..=max).step_by(step as usize).collect();
    ticks.push(max);
    ticks.sort_unstable();
    ticks.dedup();
    ticks
}
