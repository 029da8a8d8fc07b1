// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ferry_adapters::VecLineSource;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Records the lines it sees and the highest number of overlapping calls.
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<String>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
    delay: Option<Duration>,
    hang_on: Option<&'static str>,
    panic_on: Option<&'static str>,
    fail_on: Option<&'static str>,
}

impl Recorder {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait::async_trait]
impl LineHandler for Recorder {
    async fn handle(&self, line: String) -> Result<LineOutcome, HandlerError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        self.seen.lock().push(line.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.hang_on == Some(line.as_str()) {
            std::future::pending::<()>().await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.panic_on == Some(line.as_str()) {
            panic!("handler blew up on {line}");
        }
        if self.fail_on == Some(line.as_str()) {
            return Err(HandlerError::Record(ferry_storage::RecordError::Io {
                path: line.into(),
                source: std::io::Error::other("disk full"),
            }));
        }
        Ok(LineOutcome::Accumulated)
    }
}

#[tokio::test]
async fn lines_are_handled_in_order_then_completes() {
    let pipeline = SequentialPipeline::new(Recorder::default());

    let summary = pipeline
        .run(VecLineSource::new(["a\tb", "c\td"]))
        .await
        .unwrap();

    assert_eq!(pipeline.handler().seen(), vec!["a\tb", "c\td"]);
    assert_eq!(summary.lines, 2);
    assert_eq!(summary.handled(), 2);
    assert_eq!(summary.source, "memory");
}

#[tokio::test]
async fn empty_source_completes_without_handler_calls() {
    let pipeline = SequentialPipeline::new(Recorder::default());

    let summary = pipeline.run(VecLineSource::new(Vec::<String>::new())).await.unwrap();

    assert!(pipeline.handler().seen().is_empty());
    assert_eq!(summary.lines, 0);
    assert_eq!(summary.handled(), 0);
}

#[tokio::test(start_paused = true)]
async fn slow_handler_never_overlaps_fast_source() {
    let lines: Vec<String> = (0..50).map(|i| format!("{i}\tx")).collect();
    let pipeline = SequentialPipeline::new(Recorder::with_delay(Duration::from_millis(10)));

    let summary = pipeline.run(VecLineSource::new(lines.clone())).await.unwrap();

    assert_eq!(pipeline.handler().seen(), lines);
    assert_eq!(pipeline.handler().max_active.load(Ordering::SeqCst), 1);
    assert_eq!(summary.accumulated, 50);
}

#[tokio::test(start_paused = true)]
async fn close_during_drain_waits_for_queue() {
    // Source finishes long before the handler catches up
    let pipeline = SequentialPipeline::new(Recorder::with_delay(Duration::from_secs(1)));

    let summary = pipeline
        .run(VecLineSource::new(["1\ta", "2\tb", "3\tc"]))
        .await
        .unwrap();

    assert_eq!(summary.handled(), 3);
    assert_eq!(pipeline.handler().active.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn slow_source_with_fast_handler() {
    let pipeline = SequentialPipeline::new(Recorder::default());
    let source = VecLineSource::new(["1\ta", "2\tb"])
        .with_delay(Duration::from_secs(1))
        .with_close_delay(Duration::from_secs(5));

    let summary = pipeline.run(source).await.unwrap();

    assert_eq!(pipeline.handler().seen(), vec!["1\ta", "2\tb"]);
    assert_eq!(summary.handled(), 2);
}

#[tokio::test]
async fn handler_errors_are_counted_not_fatal() {
    let recorder = Recorder {
        fail_on: Some("bad"),
        ..Recorder::default()
    };
    let pipeline = SequentialPipeline::new(recorder);

    let summary = pipeline
        .run(VecLineSource::new(["ok", "bad", "ok2"]))
        .await
        .unwrap();

    assert_eq!(pipeline.handler().seen(), vec!["ok", "bad", "ok2"]);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.accumulated, 2);
}

#[tokio::test]
async fn handler_panic_is_a_failure() {
    let recorder = Recorder {
        panic_on: Some("boom"),
        ..Recorder::default()
    };
    let pipeline = SequentialPipeline::new(recorder);

    let summary = pipeline
        .run(VecLineSource::new(["boom", "after"]))
        .await
        .unwrap();

    assert_eq!(pipeline.handler().seen(), vec!["boom", "after"]);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.accumulated, 1);
}

#[tokio::test(start_paused = true)]
async fn stalled_handler_times_out_and_pipeline_proceeds() {
    let recorder = Recorder {
        hang_on: Some("stuck"),
        ..Recorder::default()
    };
    let config = PipelineConfig {
        handler_timeout: Some(Duration::from_secs(30)),
    };
    let pipeline = SequentialPipeline::with_config(recorder, config);

    let summary = pipeline
        .run(VecLineSource::new(["first", "stuck", "last"]))
        .await
        .unwrap();

    assert_eq!(pipeline.handler().seen(), vec!["first", "stuck", "last"]);
    assert_eq!(summary.timed_out, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.accumulated, 2);
}

#[tokio::test]
async fn source_read_error_closes_the_source() {
    let pipeline = SequentialPipeline::new(Recorder::default());
    let source = VecLineSource::new(["a", "b", "c"]).failing_after(2);

    let summary = pipeline.run(source).await.unwrap();

    assert_eq!(pipeline.handler().seen(), vec!["a", "b"]);
    assert!(summary.source_error.is_some());
}

#[tokio::test]
async fn run_file_reads_lines_from_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("input.tsv");
    std::fs::write(&path, "a\tb\r\nc\td\n").unwrap();
    let pipeline = SequentialPipeline::new(Recorder::default());

    let summary = pipeline.run_file(&path).await.unwrap();

    assert_eq!(pipeline.handler().seen(), vec!["a\tb", "c\td"]);
    assert_eq!(summary.lines, 2);
}

#[tokio::test]
async fn run_file_missing_is_setup_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let pipeline = SequentialPipeline::new(Recorder::default());

    let err = pipeline.run_file(&dir.path().join("absent.tsv")).await.unwrap_err();

    assert!(matches!(err, PipelineRunError::Source(SourceError::Open { .. })));
    assert!(pipeline.handler().seen().is_empty());
}
