//! Export: CSV partitions plus a JSON manifest.
//!
//! Layout of an export directory:
//! - `train.csv` / `test.csv`: header `label,x0,x1,...`, one window per row,
//!   in the dataset's shuffled order
//! - `manifest.json`: request, label vocabulary, per-recording counts and
//!   the dataset hash
//!
//! Sample values are written with Rust's shortest round-trip formatting, so
//! parsing the CSV back yields the exact `f64` values.

use crate::dataset::{Dataset, Partition, RecordingSummary};
use crate::domain::DatasetRequest;
use crate::rng::SHUFFLE_SEED;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current schema version for the manifest.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("manifest serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported manifest schema version {found} (max supported: {max})", max = SCHEMA_VERSION)]
    UnsupportedSchema { found: u32 },
}

/// Everything about an export except the arrays themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportManifest {
    pub schema_version: u32,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub request: DatasetRequest,
    pub shuffle_seed: u64,
    pub labels: Vec<String>,
    pub nclasses: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub recordings: Vec<RecordingSummary>,
    pub dataset_hash: String,
}

impl ExportManifest {
    pub fn for_dataset(dataset: &Dataset) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at: chrono::Utc::now(),
            request: dataset.request.clone(),
            shuffle_seed: SHUFFLE_SEED,
            labels: dataset.labels.clone(),
            nclasses: dataset.nclasses,
            train_rows: dataset.train.len(),
            test_rows: dataset.test.len(),
            recordings: dataset.recordings.clone(),
            dataset_hash: dataset.fingerprint().0,
        }
    }
}

/// Write one partition as CSV to any writer.
pub fn write_partition_csv<W: std::io::Write>(partition: &Partition, out: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(out);

    let mut header = Vec::with_capacity(partition.windows().window_len() + 1);
    header.push("label".to_string());
    header.extend((0..partition.windows().window_len()).map(|i| format!("x{i}")));
    wtr.write_record(&header)?;

    let mut record = Vec::with_capacity(header.len());
    for (window, label) in partition.iter() {
        record.clear();
        record.push(label.to_string());
        record.extend(window.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write `train.csv`, `test.csv` and `manifest.json` into `dir`.
pub fn export_dataset(dataset: &Dataset, dir: &Path) -> Result<ExportManifest, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for (name, partition) in [("train.csv", &dataset.train), ("test.csv", &dataset.test)] {
        let path = dir.join(name);
        let file = fs::File::create(&path).map_err(|source| ExportError::Io { path, source })?;
        write_partition_csv(partition, std::io::BufWriter::new(file))?;
    }

    let manifest = ExportManifest::for_dataset(dataset);
    let path = dir.join("manifest.json");
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(&path, json).map_err(|source| ExportError::Io { path, source })?;

    Ok(manifest)
}

/// Load `manifest.json` from an export directory, rejecting unknown schema versions.
pub fn read_manifest(dir: &Path) -> Result<ExportManifest, ExportError> {
    let path = dir.join("manifest.json");
    let json = fs::read_to_string(&path).map_err(|source| ExportError::Io { path, source })?;
    let manifest: ExportManifest = serde_json::from_str(&json)?;
    if manifest.schema_version > SCHEMA_VERSION {
        return Err(ExportError::UnsupportedSchema {
            found: manifest.schema_version,
        });
    }
    Ok(manifest)
}
