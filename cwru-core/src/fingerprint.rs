//! Dataset fingerprinting: deterministic identification of a built dataset.
//!
//! The hash covers the request, the label vocabulary and both partitions in
//! their final (shuffled) order. Sample values are hashed as little-endian
//! `f64` bits and labels as little-endian `u64`, so the hash is identical
//! across platforms and across runs with the same inputs.

use crate::dataset::{Dataset, Partition};
use crate::domain::DatasetHash;

/// BLAKE3 hash over everything a consumer of the dataset can observe.
pub fn dataset_hash(dataset: &Dataset) -> DatasetHash {
    let mut hasher = blake3::Hasher::new();

    hasher.update(dataset.request.family.as_str().as_bytes());
    hasher.update(dataset.request.rpm.as_str().as_bytes());
    hasher.update(&(dataset.request.window_len as u64).to_le_bytes());
    hasher.update(&dataset.request.test_ratio.to_le_bytes());

    hasher.update(&(dataset.labels.len() as u64).to_le_bytes());
    for label in &dataset.labels {
        hasher.update(&(label.len() as u64).to_le_bytes());
        hasher.update(label.as_bytes());
    }

    hash_partition(&mut hasher, b"train", &dataset.train);
    hash_partition(&mut hasher, b"test", &dataset.test);

    DatasetHash(hasher.finalize().to_hex().to_string())
}

fn hash_partition(hasher: &mut blake3::Hasher, tag: &[u8], partition: &Partition) {
    hasher.update(tag);
    hasher.update(&(partition.len() as u64).to_le_bytes());
    for value in partition.windows().as_slice() {
        hasher.update(&value.to_le_bytes());
    }
    for &label in partition.labels() {
        hasher.update(&(label as u64).to_le_bytes());
    }
}
