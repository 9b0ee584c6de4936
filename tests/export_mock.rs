use std::sync::{Arc, Mutex};

use tennislog::{
    config::ExportConfig,
    export::{
        ExportError, ExportResult, ExportTarget, Exporter, MatchReport, ReportSink,
        UNEXPECTED_FAILURE_MESSAGE,
    },
    point::Point,
};

struct RecordingSink {
    seen: Arc<Mutex<Vec<MatchReport>>>,
}

impl ReportSink for RecordingSink {
    fn deliver(&mut self, report: &MatchReport) -> ExportResult<()> {
        self.seen.lock().expect("lock").push(report.clone());
        Ok(())
    }
}

struct BrokenSink;

impl ReportSink for BrokenSink {
    fn deliver(&mut self, _report: &MatchReport) -> ExportResult<()> {
        Err(ExportError::Delivery("relay unreachable".to_string()))
    }
}

fn fast() -> ExportConfig {
    ExportConfig { latency_ms: 5 }
}

fn sample_points() -> Vec<Point> {
    vec![
        Point {
            sequence: 1,
            score_difference: 1,
        },
        Point {
            sequence: 2,
            score_difference: 0,
        },
    ]
}

#[tokio::test]
async fn empty_points_fail_without_delivery() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let exporter = Exporter::new(Box::new(RecordingSink { seen: Arc::clone(&seen) }), fast());

    let outcome = exporter
        .submit_report(
            &[],
            &ExportTarget::Email {
                recipient: "a@b.com".to_string(),
            },
        )
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, "No data to export.");
    assert!(seen.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn blank_recipient_fails_for_email() {
    let exporter = Exporter::mock(fast());
    let points = vec![Point {
        sequence: 1,
        score_difference: 1,
    }];

    for recipient in ["", "   "] {
        let outcome = exporter
            .submit_report(
                &points,
                &ExportTarget::Email {
                    recipient: recipient.to_string(),
                },
            )
            .await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Please enter a recipient email address.");
    }
}

#[tokio::test]
async fn sheet_export_delivers_json_payload() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let exporter = Exporter::new(Box::new(RecordingSink { seen: Arc::clone(&seen) }), fast());

    let outcome = exporter
        .submit_report(&sample_points(), &ExportTarget::Sheet)
        .await;

    assert!(outcome.success, "{}", outcome.message);
    assert!(outcome.message.starts_with("Data export for match on "));
    assert!(outcome.message.ends_with("initiated (mock)."));

    let seen = seen.lock().expect("lock");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].target, ExportTarget::Sheet);
    assert_eq!(seen[0].points, sample_points());
    let decoded: Vec<Point> = serde_json::from_str(&seen[0].payload).expect("payload json");
    assert_eq!(decoded, sample_points());
}

#[tokio::test]
async fn email_export_names_recipient() {
    let exporter = Exporter::mock(fast());
    let outcome = exporter
        .submit_report(
            &sample_points(),
            &ExportTarget::Email {
                recipient: " coach@club.org ".to_string(),
            },
        )
        .await;

    assert!(outcome.success);
    assert!(outcome.message.contains("sent to coach@club.org (mock)"));
}

#[tokio::test]
async fn sink_failure_surfaces_generic_message() {
    let exporter = Exporter::new(Box::new(BrokenSink), fast());
    let outcome = exporter
        .submit_report(&sample_points(), &ExportTarget::Sheet)
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, UNEXPECTED_FAILURE_MESSAGE);
}

#[tokio::test]
async fn submission_waits_for_configured_latency() {
    let exporter = Exporter::mock(ExportConfig { latency_ms: 60 });
    let started = std::time::Instant::now();
    let outcome = exporter
        .submit_report(&sample_points(), &ExportTarget::Sheet)
        .await;

    assert!(outcome.success);
    assert!(started.elapsed() >= std::time::Duration::from_millis(60));
}
