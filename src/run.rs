use crate::metric::MetricSnapshot;
use std::path::Path;

/// Phase of the run a logging tick belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Training.
    Train,
    /// Validation.
    Val,
    /// Test.
    Test,
}

impl Mode {
    /// Short name used in log prefixes and snapshot records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Train => "train",
            Mode::Val => "val",
            Mode::Test => "test",
        }
    }
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current learning rate(s) of the optimizer.
#[derive(Debug, Clone, PartialEq)]
pub enum LearningRate {
    /// One rate shared by every parameter group.
    Value(f64),
    /// One rate per named parameter group, in group order.
    Groups(Vec<(String, f64)>),
}

/// Read-only view of the training run a hook is attached to.
///
/// Methods with a default implementation are optional capabilities; a run
/// that does not supply them returns `None`. The hook never mutates the run
/// through this trait.
pub trait RunContext {
    /// Current mode.
    fn mode(&self) -> Mode;

    /// Current epoch, as displayed.
    fn epoch(&self) -> usize;

    /// Current iteration within the whole run.
    fn iter(&self) -> usize;

    /// Current iteration within the epoch, as displayed in by-epoch mode.
    fn inner_iter(&self) -> usize;

    /// Total number of iterations of the run.
    fn max_iters(&self) -> usize;

    /// Number of iterations in one epoch.
    fn iters_per_epoch(&self) -> usize;

    /// Directory the run writes its artifacts to.
    fn work_dir(&self) -> &Path;

    /// Timestamp fixed at run start, used to name the JSON log file.
    fn timestamp(&self) -> &str;

    /// Scalar metrics accumulated since the last tick, in insertion order.
    fn buffer_output(&self) -> MetricSnapshot;

    /// Run-level metadata, written as the first JSON record when supplied.
    fn meta(&self) -> Option<&MetricSnapshot> {
        None
    }

    /// Learning rate(s), supplied in training mode.
    fn lr(&self) -> Option<LearningRate> {
        None
    }

    /// Peak accelerator memory allocated so far, in bytes, when an
    /// accelerator is present.
    fn max_memory_allocated(&self) -> Option<u64> {
        None
    }
}
