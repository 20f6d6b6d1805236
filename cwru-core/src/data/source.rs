//! Signal sources: where the dataset builder gets one raw signal per recording.

use super::acquire::Acquirer;
use super::mat::{read_drive_end_signal, MalformedRecording};
use super::provider::AcquisitionError;
use crate::domain::RecordingDescriptor;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Malformed(#[from] MalformedRecording),
}

/// Produces the raw drive-end signal of a recording.
pub trait SignalSource {
    fn load_signal(&self, recording: &RecordingDescriptor) -> Result<Vec<f64>, SignalError>;
}

/// Signals read from MAT files in the local cache, downloaded on a miss.
pub struct MatSignalSource<'a> {
    acquirer: &'a Acquirer,
}

impl<'a> MatSignalSource<'a> {
    pub fn new(acquirer: &'a Acquirer) -> Self {
        Self { acquirer }
    }
}

impl SignalSource for MatSignalSource<'_> {
    fn load_signal(&self, recording: &RecordingDescriptor) -> Result<Vec<f64>, SignalError> {
        let path = self.acquirer.ensure_local(recording)?;
        Ok(read_drive_end_signal(&path, recording)?)
    }
}

/// Signals held in memory, keyed by recording URL.
///
/// Used by tests and benchmarks, and by callers that already hold the data.
#[derive(Debug, Clone, Default)]
pub struct MemorySignalSource {
    signals: HashMap<String, Vec<f64>>,
}

impl MemorySignalSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, recording: &RecordingDescriptor, signal: Vec<f64>) {
        self.signals.insert(recording.url.clone(), signal);
    }

    pub fn with(mut self, recording: &RecordingDescriptor, signal: Vec<f64>) -> Self {
        self.insert(recording, signal);
        self
    }
}

impl SignalSource for MemorySignalSource {
    fn load_signal(&self, recording: &RecordingDescriptor) -> Result<Vec<f64>, SignalError> {
        self.signals.get(&recording.url).cloned().ok_or_else(|| {
            SignalError::Acquisition(AcquisitionError::NotFound {
                url: recording.url.clone(),
            })
        })
    }
}
