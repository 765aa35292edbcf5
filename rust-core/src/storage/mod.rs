//! Persistence of spectrum results keyed by timestamp
//! 
//! Timestamps are opaque strings. Range queries compare them
//! lexicographically, so callers must pick a format (ISO-8601) whose
//! lexicographic order is chronological.

pub mod memory;
pub mod json_dir;

pub use memory::InMemorySpectrumStore;
pub use json_dir::JsonDirectoryStore;

use crate::error::Result;
use crate::spectrum::SpectrumResult;

/// Pluggable storage backend for spectrum results
/// 
/// Implementations must be thread-safe (Send + Sync) so one store can back
/// parallel analysis.
pub trait SpectrumStore: Send + Sync {
    /// Store a result, replacing any previous one at the same timestamp
    fn store(&self, timestamp: &str, result: &SpectrumResult) -> Result<()>;

    /// Retrieve the result at `timestamp`, `NotFound` when absent
    fn retrieve(&self, timestamp: &str) -> Result<SpectrumResult>;

    /// Stored timestamps in `[start, end]`, sorted ascending
    /// 
    /// Empty when `start > end`.
    fn timestamps_between(&self, start: &str, end: &str) -> Result<Vec<String>>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}
