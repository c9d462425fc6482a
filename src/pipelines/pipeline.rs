//! Pipeline trait.
use crate::error::Error;

/// A whole processing run over a corpus.
///
/// Generic over the value reported once the run completes (counters, skipped files…).
pub trait Pipeline<T> {
    /// Version of the output format produced by the pipeline.
    fn version() -> &'static str;
    fn run(&self) -> Result<T, Error>;
}
