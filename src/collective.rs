/// Coordination seam for multi-process runs.
///
/// The hook only needs two collective facts: whether the calling process is
/// the designated writer, and the maximum of a value across every
/// participant. Implementations back these with a real distributed runtime;
/// [`SingleProcess`] is enough everywhere else.
pub trait Collective {
    /// Whether this process is the designated writer (rank 0).
    fn is_main(&self) -> bool;

    /// Maximum of `value` across every participating process.
    ///
    /// Blocks the calling thread until all participants have joined.
    fn reduce_max(&self, value: f64) -> f64;
}

/// Collective for single-process runs: the process is always the writer and
/// every reduction is the identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleProcess;

impl Collective for SingleProcess {
    fn is_main(&self) -> bool {
        true
    }

    fn reduce_max(&self, value: f64) -> f64 {
        value
    }
}
