//! Dataset construction: select → acquire → window → split → shuffle.
//!
//! Recordings are processed strictly in selection order. Each recording's
//! windows are cut into a training prefix and a testing suffix before they are
//! appended to the global partitions, so the test ratio holds per class. Once
//! every recording is folded in, train and test are each reordered by their
//! own seeded permutation (same seed, independent generators).

use crate::catalog::Catalog;
use crate::data::{AcquisitionError, MalformedRecording, SignalError, SignalSource};
use crate::domain::{DatasetHash, DatasetRequest, InvalidConfiguration, Label, RecordingDescriptor};
use crate::fingerprint;
use crate::rng::{seeded_permutation, SHUFFLE_SEED};
use crate::window::{RecordingSplit, WindowMatrix};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from dataset construction. Any of them aborts the build.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error(transparent)]
    InvalidConfiguration(#[from] InvalidConfiguration),

    #[error("recording '{recording}': {source}")]
    Acquisition {
        recording: String,
        #[source]
        source: AcquisitionError,
    },

    #[error("recording '{recording}' is malformed: {source}")]
    MalformedRecording {
        recording: String,
        #[source]
        source: MalformedRecording,
    },
}

impl DatasetError {
    fn from_signal(recording: &RecordingDescriptor, err: SignalError) -> Self {
        let recording = recording.id.clone();
        match err {
            SignalError::Acquisition(source) => DatasetError::Acquisition { recording, source },
            SignalError::Malformed(source) => DatasetError::MalformedRecording { recording, source },
        }
    }
}

/// Windows plus one label per window. Only grows through `push_rows`, so
/// row `i` of `windows` always carries `labels[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partition {
    windows: WindowMatrix,
    labels: Vec<Label>,
}

impl Partition {
    pub fn empty(window_len: usize) -> Self {
        Self {
            windows: WindowMatrix::empty(window_len),
            labels: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn windows(&self) -> &WindowMatrix {
        &self.windows
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Append `rows` of `windows`, all carrying `label`.
    pub fn push_rows(&mut self, windows: &WindowMatrix, rows: std::ops::Range<usize>, label: Label) {
        self.labels.extend(std::iter::repeat(label).take(rows.len()));
        self.windows.extend_rows(windows, rows);
        debug_assert_eq!(self.labels.len(), self.windows.rows());
    }

    /// Reorder windows and labels together by a seeded permutation.
    pub fn shuffled(&self, seed: u64) -> Partition {
        debug_assert_eq!(self.labels.len(), self.windows.rows());
        let order = seeded_permutation(self.len(), seed);
        Partition {
            windows: self.windows.permuted(&order),
            labels: order.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// `(window, label)` pairs in partition order.
    pub fn iter(&self) -> impl Iterator<Item = (&[f64], Label)> + '_ {
        self.windows.iter_rows().zip(self.labels.iter().copied())
    }

    /// Window count per label.
    pub fn class_counts(&self, nclasses: usize) -> Vec<usize> {
        let mut counts = vec![0; nclasses];
        for &label in &self.labels {
            if let Some(c) = counts.get_mut(label) {
                *c += 1;
            }
        }
        counts
    }
}

/// What one recording contributed, recorded before shuffling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingSummary {
    pub id: String,
    pub label: Label,
    pub samples: usize,
    pub windows: usize,
    pub train: usize,
    pub test: usize,
    pub discarded: usize,
}

/// A built, shuffled dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub request: DatasetRequest,
    pub train: Partition,
    pub test: Partition,
    /// Recording id for each label, in label order.
    pub labels: Vec<String>,
    pub nclasses: usize,
    pub recordings: Vec<RecordingSummary>,
}

impl Dataset {
    /// Build the dataset for `request` from the recordings `catalog` selects.
    pub fn build(
        request: &DatasetRequest,
        catalog: &Catalog,
        source: &dyn SignalSource,
    ) -> Result<Self, DatasetError> {
        // Fields are public; re-check in case the request was assembled by hand.
        let request = DatasetRequest::new(
            request.family,
            request.rpm,
            request.window_len,
            request.test_ratio,
        )?;
        let selection = catalog.select(request.family, request.rpm);
        log::info!(
            "{} {}: {} recordings selected, window length {}, test ratio {}",
            request.family,
            request.rpm,
            selection.len(),
            request.window_len,
            request.test_ratio
        );

        let mut train = Partition::empty(request.window_len);
        let mut test = Partition::empty(request.window_len);
        let mut recordings = Vec::with_capacity(selection.len());

        for (label, rec) in selection.iter().enumerate() {
            let signal = source
                .load_signal(rec)
                .map_err(|e| DatasetError::from_signal(rec, e))?;
            let split = RecordingSplit::new(&signal, request.window_len, request.test_ratio);

            log::info!(
                "Shape of timeseries file {}.mat: ({},), Label: {label}",
                rec.id,
                signal.len()
            );

            train.push_rows(&split.windows, split.train_rows(), label);
            test.push_rows(&split.windows, split.test_rows(), label);

            recordings.push(RecordingSummary {
                id: rec.id.clone(),
                label,
                samples: signal.len(),
                windows: split.windows.rows(),
                train: split.n_train,
                test: split.n_test(),
                discarded: split.discarded,
            });
        }

        let labels: Vec<String> = selection.iter().map(|r| r.id.clone()).collect();

        Ok(Self {
            request,
            train: train.shuffled(SHUFFLE_SEED),
            test: test.shuffled(SHUFFLE_SEED),
            nclasses: labels.len(),
            labels,
            recordings,
        })
    }

    pub fn window_len(&self) -> usize {
        self.request.window_len
    }

    /// BLAKE3 content hash of the dataset.
    pub fn fingerprint(&self) -> DatasetHash {
        fingerprint::dataset_hash(self)
    }
}
