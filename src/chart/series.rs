use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::point::Point;

/// Offset of the synthetic second point added to a single-point history.
pub const SINGLE_POINT_OFFSET: f64 = 0.001;

/// A point on the continuous x axis. Synthetic crossings have fractional
/// sequences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// X coordinate.
    pub sequence: f64,
    /// Score difference at `sequence`.
    pub value: f64,
}

impl From<Point> for ChartPoint {
    fn from(value: Point) -> Self {
        Self {
            sequence: value.sequence as f64,
            value: value.score_difference as f64,
        }
    }
}

/// One slot of a split series; `None` is a gap the renderer must not bridge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// X coordinate.
    pub sequence: f64,
    /// Value, or `None` for a gap.
    pub value: Option<f64>,
}

/// Adds explicit zero crossings between adjacent points of opposite sign.
///
/// The output is sorted by sequence with one entry per sequence; when two
/// entries share a sequence the zero-valued one wins. Re-enriching the
/// output is a no-op.
pub fn enrich(points: &[ChartPoint]) -> Vec<ChartPoint> {
    let mut enriched = Vec::with_capacity(points.len() * 2);

    match points {
        [] => return enriched,
        [only] => {
            enriched.push(*only);
            enriched.push(ChartPoint {
                sequence: only.sequence + SINGLE_POINT_OFFSET,
                value: only.value,
            });
            return enriched;
        }
        _ => {}
    }

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        enriched.push(a);
        if a.value * b.value < 0.0 {
            let intercept = a.sequence - a.value * (b.sequence - a.sequence) / (b.value - a.value);
            enriched.push(ChartPoint {
                sequence: intercept,
                value: 0.0,
            });
        }
    }
    if let Some(last) = points.last() {
        enriched.push(*last);
    }

    enriched.sort_by(|a, b| a.sequence.total_cmp(&b.sequence));
    dedup_prefer_zero(enriched)
}

fn dedup_prefer_zero(sorted: Vec<ChartPoint>) -> Vec<ChartPoint> {
    let mut out: Vec<ChartPoint> = Vec::with_capacity(sorted.len());
    for point in sorted {
        match out.last_mut() {
            Some(prev) if prev.sequence.total_cmp(&point.sequence) == Ordering::Equal => {
                if prev.value != 0.0 && point.value == 0.0 {
                    *prev = point;
                }
            }
            _ => out.push(point),
        }
    }
    out
}

/// Splits an enriched series into `(positive, negative)`.
///
/// Both outputs have one slot per input point. Zeros land in both series so
/// the two lines meet on the axis.
pub fn split(enriched: &[ChartPoint]) -> (Vec<SeriesPoint>, Vec<SeriesPoint>) {
    let positive = enriched
        .iter()
        .map(|p| SeriesPoint {
            sequence: p.sequence,
            value: (p.value >= 0.0).then_some(p.value),
        })
        .collect();
    let negative = enriched
        .iter()
        .map(|p| SeriesPoint {
            sequence: p.sequence,
            value: (p.value <= 0.0).then_some(p.value),
        })
        .collect();
    (positive, negative)
}
