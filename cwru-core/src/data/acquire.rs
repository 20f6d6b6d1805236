//! Acquisition orchestrator: cache-on-miss for single recordings and batches.

use super::cache::RecordingCache;
use super::provider::{AcquisitionError, AcquisitionProgress, RecordingFetcher};
use crate::domain::RecordingDescriptor;
use std::path::PathBuf;

/// Guarantees recordings exist in the local cache, fetching the missing ones.
pub struct Acquirer {
    cache: RecordingCache,
    fetcher: Option<Box<dyn RecordingFetcher>>,
}

impl Acquirer {
    pub fn new(cache: RecordingCache, fetcher: impl RecordingFetcher + 'static) -> Self {
        Self {
            cache,
            fetcher: Some(Box::new(fetcher)),
        }
    }

    /// An acquirer that never touches the network; cache misses are errors.
    pub fn offline(cache: RecordingCache) -> Self {
        Self {
            cache,
            fetcher: None,
        }
    }

    pub fn cache(&self) -> &RecordingCache {
        &self.cache
    }

    pub fn is_offline(&self) -> bool {
        self.fetcher.is_none()
    }

    /// Name of the fetcher used on cache misses, `None` when offline.
    pub fn fetcher_name(&self) -> Option<&str> {
        self.fetcher.as_deref().map(|f| f.name())
    }

    /// Local path of a recording, downloading it first if it is not cached.
    pub fn ensure_local(&self, recording: &RecordingDescriptor) -> Result<PathBuf, AcquisitionError> {
        let path = self.cache.path_for(recording);

        if path.is_file() {
            log::debug!("cache hit: '{}'", path.display());
            return Ok(path);
        }

        let fetcher = self
            .fetcher
            .as_deref()
            .ok_or_else(|| AcquisitionError::NotCachedOffline { path: path.clone() })?;

        log::info!("Downloading to: '{}'", path.display());
        log::debug!("fetching {} via {}", recording.url, fetcher.name());
        let bytes = fetcher.fetch(&recording.url)?;
        if bytes.is_empty() {
            return Err(AcquisitionError::EmptyBody {
                url: recording.url.clone(),
            });
        }
        self.cache.write(recording, &bytes)
    }

    /// Make every recording of a selection available locally.
    ///
    /// Failures do not stop the batch; they are collected in the summary.
    pub fn fetch_all(
        &self,
        recordings: &[RecordingDescriptor],
        progress: &dyn AcquisitionProgress,
    ) -> AcquisitionSummary {
        let total = recordings.len();
        let mut succeeded = 0;
        let mut errors: Vec<(String, AcquisitionError)> = Vec::new();

        for (i, rec) in recordings.iter().enumerate() {
            progress.on_start(rec, i, total);
            let result = self.ensure_local(rec).map(|_| ());
            progress.on_complete(rec, i, total, &result);

            match result {
                Ok(()) => succeeded += 1,
                Err(e) => errors.push((rec.id.clone(), e)),
            }
        }

        let failed = errors.len();
        progress.on_batch_complete(succeeded, failed, total);

        AcquisitionSummary {
            total,
            succeeded,
            failed,
            errors,
        }
    }
}

/// Summary of a batch acquisition.
#[derive(Debug)]
pub struct AcquisitionSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<(String, AcquisitionError)>,
}

impl AcquisitionSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
