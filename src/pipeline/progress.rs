use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use log::debug;

/// Shared flag for coarse cancellation; checked between files and compounds,
/// never inside an algorithm
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Token that has not been cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; every clone observes it
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Progress notifications emitted while a batch runs
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A file finished processing
    FileProcessed {
        /// File stem
        file: String,
        /// Files finished so far, including failures
        completed: usize,
        /// Files in the batch
        total: usize,
    },
    /// A file failed and was skipped
    FileFailed {
        /// File stem
        file: String,
        /// Error description
        message: String,
    },
    /// A compound's calibration curve was fitted
    CompoundCalibrated {
        /// Compound name
        compound: String,
        /// R² of the accepted fit
        r_squared: f64,
    },
    /// The batch stopped early
    Cancelled,
}

/// Optional progress sink; sending never blocks the pipeline on a closed
/// receiver
#[derive(Debug, Clone, Default)]
pub(crate) struct ProgressSink {
    sender: Option<Sender<ProgressEvent>>,
}

impl ProgressSink {
    pub(crate) fn new(sender: Option<Sender<ProgressEvent>>) -> Self {
        Self { sender }
    }

    pub(crate) fn send(&self, event: ProgressEvent) {
        if let Some(sender) = &self.sender {
            if sender.send(event).is_err() {
                debug!("Progress receiver dropped");
            }
        }
    }
}
