//! Fetcher trait, progress reporting and structured acquisition errors.
//!
//! The `RecordingFetcher` trait abstracts over where recording bytes come from
//! (HTTP in production, in-memory maps in tests). The cache layer sits above
//! this trait; fetchers don't know about the cache.

use crate::domain::RecordingDescriptor;
use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for acquisition operations.
///
/// These are designed to be displayable in CLI output as-is.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("can't create directory '{}': {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't write cache file '{}': {source}", .path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("recording not found at {url}")]
    NotFound { url: String },

    #[error("empty response body from {url}")]
    EmptyBody { url: String },

    #[error("'{}' is not cached and offline mode is on", .path.display())]
    NotCachedOffline { path: PathBuf },

    #[error("giving up on {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        last: Box<AcquisitionError>,
    },
}

impl AcquisitionError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            AcquisitionError::NetworkUnreachable(_) => true,
            AcquisitionError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Source of raw recording bytes.
pub trait RecordingFetcher: Send + Sync {
    /// Human-readable name of this fetcher.
    fn name(&self) -> &str;

    /// Fetch the full body at `url`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AcquisitionError>;
}

/// Progress callback for multi-recording operations.
pub trait AcquisitionProgress: Send {
    /// Called when starting to acquire a recording.
    fn on_start(&self, recording: &RecordingDescriptor, index: usize, total: usize);

    /// Called when a recording is available locally, or failed.
    fn on_complete(
        &self,
        recording: &RecordingDescriptor,
        index: usize,
        total: usize,
        result: &Result<(), AcquisitionError>,
    );

    /// Called when the entire batch is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Progress reporter that writes through the `log` facade.
pub struct LogProgress;

impl AcquisitionProgress for LogProgress {
    fn on_start(&self, recording: &RecordingDescriptor, index: usize, total: usize) {
        log::info!(
            "[{}/{}] {} {} {}",
            index + 1,
            total,
            recording.family,
            recording.rpm,
            recording.id
        );
    }

    fn on_complete(
        &self,
        recording: &RecordingDescriptor,
        _index: usize,
        _total: usize,
        result: &Result<(), AcquisitionError>,
    ) {
        match result {
            Ok(()) => log::info!("  OK: {}", recording.id),
            Err(e) => log::warn!("  FAIL: {}: {e}", recording.id),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        log::info!("Acquisition complete: {succeeded}/{total} available, {failed} failed");
    }
}
