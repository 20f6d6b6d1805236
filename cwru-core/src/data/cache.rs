//! Local recording cache.
//!
//! Layout: `{root}/{family}/{rpm}/{recording-id}.mat`
//!
//! Features:
//! - Directories created on demand (an existing directory is fine)
//! - Atomic writes (write to .tmp, rename into place)
//! - Entries are never invalidated or re-fetched once present
//! - Status query per recording (cached, size on disk)

use super::provider::AcquisitionError;
use crate::domain::RecordingDescriptor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// `~/Datasets/CWRU`, or `Datasets/CWRU` relative to the working directory
/// when no home directory can be determined.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join("Datasets")
        .join("CWRU")
}

/// The on-disk recording cache.
#[derive(Debug, Clone)]
pub struct RecordingCache {
    root: PathBuf,
}

impl RecordingCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the cache.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for a (family, rpm) pair: `{root}/{family}/{rpm}/`
    pub fn dir_for(&self, recording: &RecordingDescriptor) -> PathBuf {
        self.root
            .join(recording.family.as_str())
            .join(recording.rpm.as_str())
    }

    /// Path of the cached MAT file for a recording.
    pub fn path_for(&self, recording: &RecordingDescriptor) -> PathBuf {
        self.dir_for(recording).join(format!("{}.mat", recording.id))
    }

    /// Create the recording's directory if it does not exist yet.
    pub fn ensure_dir(&self, recording: &RecordingDescriptor) -> Result<PathBuf, AcquisitionError> {
        let dir = self.dir_for(recording);
        fs::create_dir_all(&dir).map_err(|source| AcquisitionError::Filesystem {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    pub fn contains(&self, recording: &RecordingDescriptor) -> bool {
        self.path_for(recording).is_file()
    }

    /// Write a recording's bytes into the cache.
    ///
    /// Writes are atomic: write to `.mat.tmp` then rename.
    pub fn write(
        &self,
        recording: &RecordingDescriptor,
        bytes: &[u8],
    ) -> Result<PathBuf, AcquisitionError> {
        self.ensure_dir(recording)?;
        let path = self.path_for(recording);
        let tmp_path = path.with_extension("mat.tmp");

        fs::write(&tmp_path, bytes).map_err(|source| AcquisitionError::CacheWrite {
            path: tmp_path.clone(),
            source,
        })?;

        fs::rename(&tmp_path, &path).map_err(|source| {
            // Clean up temp file on rename failure
            let _ = fs::remove_file(&tmp_path);
            AcquisitionError::CacheWrite {
                path: path.clone(),
                source,
            }
        })?;

        Ok(path)
    }

    /// Report which of the given recordings are cached.
    pub fn status(&self, recordings: &[RecordingDescriptor]) -> Vec<CacheStatus> {
        recordings
            .iter()
            .map(|rec| {
                let path = self.path_for(rec);
                let size_bytes = fs::metadata(&path)
                    .ok()
                    .filter(|m| m.is_file())
                    .map(|m| m.len());
                CacheStatus {
                    id: rec.id.clone(),
                    path,
                    cached: size_bytes.is_some(),
                    size_bytes,
                }
            })
            .collect()
    }
}

/// Cache status for a single recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatus {
    pub id: String,
    pub path: PathBuf,
    pub cached: bool,
    pub size_bytes: Option<u64>,
}
