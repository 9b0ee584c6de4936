use tracing::info;

use super::{ExportResult, ExportTarget, MatchReport, ReportSink};

/// Sink that only logs. Stands in for a sheets API or mail relay.
#[derive(Debug, Default)]
pub struct MockReportSink;

impl ReportSink for MockReportSink {
    fn deliver(&mut self, report: &MatchReport) -> ExportResult<()> {
        match &report.target {
            ExportTarget::Sheet => info!(
                points = report.points.len(),
                bytes = report.payload.len(),
                match_date = %report.match_date,
                "mock sheet export"
            ),
            ExportTarget::Email { recipient } => info!(
                points = report.points.len(),
                %recipient,
                match_date = %report.match_date,
                "mock email report"
            ),
        }
        Ok(())
    }
}
