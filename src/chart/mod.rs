//! Momentum chart derivation from the score-difference history.

/// Y domain and x tick calculations.
pub mod axes;
/// Zero-crossing enrichment and positive/negative split.
pub mod series;

use serde::{Deserialize, Serialize};

use crate::{
    core::state::MatchState,
    point::{GameMarker, Point, SetMarker},
    types::PointSeq,
};

use self::{
    axes::{x_ticks, y_domain, YDomain},
    series::{enrich, split, ChartPoint, SeriesPoint},
};

/// Everything a renderer needs to draw the momentum chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumChart {
    /// Values `>= 0`, gaps elsewhere.
    pub positive: Vec<SeriesPoint>,
    /// Values `<= 0`, gaps elsewhere.
    pub negative: Vec<SeriesPoint>,
    /// Game annotations, passed through.
    pub game_markers: Vec<GameMarker>,
    /// Set annotations, passed through.
    pub set_markers: Vec<SetMarker>,
    /// Vertical range.
    pub y_domain: YDomain,
    /// Horizontal tick positions.
    pub x_ticks: Vec<PointSeq>,
}

/// Builds the chart for `points`, attaching the markers unchanged.
pub fn transform(
    points: &[Point],
    game_markers: &[GameMarker],
    set_markers: &[SetMarker],
) -> MomentumChart {
    let chart_points: Vec<ChartPoint> = points.iter().copied().map(ChartPoint::from).collect();
    let enriched = enrich(&chart_points);
    let (positive, negative) = split(&enriched);

    MomentumChart {
        positive,
        negative,
        game_markers: game_markers.to_vec(),
        set_markers: set_markers.to_vec(),
        y_domain: y_domain(points),
        x_ticks: x_ticks(points),
    }
}

/// Chart for the full state of a match.
pub fn from_state(state: &MatchState) -> MomentumChart {
    transform(&state.history, &state.game_markers, &state.set_markers)
}
