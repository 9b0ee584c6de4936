//! Report export collaborator: validation, simulated latency, pluggable sink.

/// Logging stand-in sink.
pub mod mock;

use std::{sync::Arc, time::Duration};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use crate::{config::ExportConfig, point::Point};

use self::mock::MockReportSink;

/// User-facing text for failures that are not precondition failures.
pub const UNEXPECTED_FAILURE_MESSAGE: &str = "An unexpected error occurred during export.";

/// Export failures. Only the first two are shown verbatim to users.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Nothing to export.
    #[error("No data to export.")]
    NoData,
    /// Email target without a recipient.
    #[error("Please enter a recipient email address.")]
    MissingRecipient,
    /// Payload could not be serialized.
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
    /// The sink refused the report.
    #[error("delivery failed: {0}")]
    Delivery(String),
    /// The delivery task panicked or was cancelled.
    #[error("export task failed: {0}")]
    Task(String),
}

impl ExportError {
    /// True for failures the user can fix by changing the request.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::NoData | Self::MissingRecipient)
    }

    /// Message suitable for display.
    pub fn user_message(&self) -> String {
        if self.is_precondition() {
            self.to_string()
        } else {
            UNEXPECTED_FAILURE_MESSAGE.to_string()
        }
    }
}

/// Result alias for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Where a report goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportTarget {
    /// Spreadsheet export.
    Sheet,
    /// Emailed report.
    Email {
        /// Destination address.
        recipient: String,
    },
}

/// Report handed to a [`ReportSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Destination.
    pub target: ExportTarget,
    /// Formatted local date of the export, e.g. `"March 4, 2025, 02:15 PM"`.
    pub match_date: String,
    /// Exported points.
    pub points: Vec<Point>,
    /// JSON rendering of `points`.
    pub payload: String,
}

/// Result of a submission, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOutcome {
    /// Whether the report went out.
    pub success: bool,
    /// User-facing message.
    pub message: String,
}

impl ReportOutcome {
    /// Unsuccessful outcome carrying `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Destination for finished reports. Implementations may block.
pub trait ReportSink: Send {
    /// Hands `report` to the destination.
    fn deliver(&mut self, report: &MatchReport) -> ExportResult<()>;
}

/// Validates, delays and delivers reports.
///
/// Clones share the same sink.
#[derive(Clone)]
pub struct Exporter {
    sink: Arc<Mutex<Box<dyn ReportSink>>>,
    latency: Duration,
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::mock(ExportConfig::default())
    }
}

impl Exporter {
    /// Exporter delivering to `sink` after `config.latency_ms`.
    pub fn new(sink: Box<dyn ReportSink>, config: ExportConfig) -> Self {
        Self {
            sink: Arc::new(Mutex::new(sink)),
            latency: Duration::from_millis(config.latency_ms),
        }
    }

    /// Exporter backed by [`MockReportSink`].
    pub fn mock(config: ExportConfig) -> Self {
        Self::new(Box::new(MockReportSink::default()), config)
    }

    /// Submits `points` to `target`. Never fails outright; every failure is
    /// folded into an unsuccessful [`ReportOutcome`].
    #[instrument(skip(self, points), fields(point_count = points.len()))]
    pub async fn submit_report(&self, points: &[Point], target: &ExportTarget) -> ReportOutcome {
        match self.try_submit(points, target).await {
            Ok(message) => {
                info!(%message, "export complete");
                ReportOutcome {
                    success: true,
                    message,
                }
            }
            Err(err) if err.is_precondition() => {
                warn!(%err, "export rejected");
                ReportOutcome::failure(err.user_message())
            }
            Err(err) => {
                error!(%err, "export failed");
                ReportOutcome::failure(err.user_message())
            }
        }
    }

    async fn try_submit(&self, points: &[Point], target: &ExportTarget) -> ExportResult<String> {
        if points.is_empty() {
            return Err(ExportError::NoData);
        }
        if let ExportTarget::Email { recipient } = target {
            if recipient.trim().is_empty() {
                return Err(ExportError::MissingRecipient);
            }
        }

        let match_date = Local::now().format("%B %-d, %Y, %I:%M %p").to_string();
        let report = MatchReport {
            target: target.clone(),
            match_date,
            points: points.to_vec(),
            payload: serde_json::to_string(points)?,
        };

        tokio::time::sleep(self.latency).await;

        let message = success_message(&report);
        let sink_ref = Arc::clone(&self.sink);
        tokio::task::spawn_blocking(move || {
            let mut sink = sink_ref.blocking_lock();
            sink.deliver(&report)
        })
        .await
        .map_err(|e| ExportError::Task(format!("join error: {e}")))??;

        Ok(message)
    }
}

fn success_message(report: &MatchReport) -> String {
    match &report.target {
        ExportTarget::Sheet => format!(
            "Data export for match on {} initiated (mock).",
            report.match_date
        ),
        ExportTarget::Email { recipient } => format!(
            "Match report for {} sent to {} (mock).",
            report.match_date,
            recipient.trim()
        ),
    }
}
