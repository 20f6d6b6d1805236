//! CWRU Core: bearing-fault recordings turned into windowed train/test datasets.
//!
//! This crate contains the whole dataset pipeline:
//! - Domain types (experiment families, speeds, recording descriptors, requests)
//! - The recording catalog and its (family, speed) selection
//! - Acquisition: on-disk cache, HTTP fetcher with retries, MAT v5 decoding
//! - Windowing, per-recording train/test split and seeded shuffling
//! - Dataset fingerprinting and CSV/JSON export

pub mod catalog;
pub mod config;
pub mod data;
pub mod dataset;
pub mod domain;
pub mod export;
pub mod fingerprint;
pub mod rng;
pub mod window;

pub use catalog::{Catalog, CatalogError};
pub use config::{ConfigFileError, CwruConfig};
pub use dataset::{Dataset, DatasetError, Partition, RecordingSummary};
pub use domain::{DatasetRequest, ExperimentFamily, InvalidConfiguration, Rpm};
