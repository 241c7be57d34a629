use std::pin::pin;

use futures_util::stream::{self, StreamExt};
use grabber_core::{DownloadOutcome, DownloadTask};
use grabber_logging::{grab_info, grab_warn};

use crate::fetch::ImageFetcher;
use crate::{GrabEvent, ProgressSink};

/// A task together with the outcome it ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub task: DownloadTask,
    pub outcome: DownloadOutcome,
}

/// Every task of a batch with its outcome, in completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<TaskOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.outcome.success).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Downloads `tasks` with at most `width` requests in flight.
///
/// Returns only after every task has produced an outcome; outcomes are
/// reported to `sink` as they complete, not in submission order.
pub async fn run_batch(
    fetcher: &dyn ImageFetcher,
    tasks: Vec<DownloadTask>,
    width: usize,
    sink: &dyn ProgressSink,
    label: &str,
) -> BatchReport {
    let total = tasks.len();
    sink.emit(GrabEvent::BatchStarted {
        label: label.to_string(),
        total,
    });

    let mut in_flight = pin!(stream::iter(tasks)
        .map(|task| async move {
            let outcome = fetcher.fetch(&task.source_url, &task.dest).await;
            TaskOutcome { task, outcome }
        })
        .buffer_unordered(width.max(1)));

    let mut report = BatchReport {
        outcomes: Vec::with_capacity(total),
    };
    while let Some(done) = in_flight.next().await {
        if !done.outcome.success {
            grab_warn!("{}", done.outcome.message);
        }
        sink.emit(GrabEvent::ImageFinished {
            task: done.task.clone(),
            outcome: done.outcome.clone(),
        });
        report.outcomes.push(done);
    }

    let (succeeded, failed) = (report.succeeded(), report.failed());
    grab_info!("Batch '{label}' finished: {succeeded} downloaded, {failed} failed");
    sink.emit(GrabEvent::BatchFinished { succeeded, failed });
    report
}
