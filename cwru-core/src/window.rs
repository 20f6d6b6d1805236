//! Fixed-length windowing of raw signals and the per-recording train/test cut.
//!
//! A signal of `len` samples yields `len / window_len` non-overlapping windows
//! in temporal order; the `len % window_len` tail samples are dropped. The
//! first `floor(n * (1 - test_ratio))` windows go to training, the rest to
//! testing. Nothing here is random.

use serde::{Deserialize, Serialize};

/// Row-major matrix of equal-length windows stored in one contiguous buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowMatrix {
    window_len: usize,
    data: Vec<f64>,
}

impl WindowMatrix {
    /// An empty matrix whose rows will be `window_len` wide.
    pub fn empty(window_len: usize) -> Self {
        Self {
            window_len,
            data: Vec::new(),
        }
    }

    /// Slice a signal into complete windows, discarding the incomplete tail.
    ///
    /// `window_len` must be positive; `DatasetRequest` guarantees this.
    pub fn from_signal(signal: &[f64], window_len: usize) -> Self {
        let rows = complete_windows(signal.len(), window_len);
        Self {
            window_len,
            data: signal[..rows * window_len].to_vec(),
        }
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Number of windows (rows).
    pub fn rows(&self) -> usize {
        if self.window_len == 0 {
            0
        } else {
            self.data.len() / self.window_len
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.window_len;
        &self.data[start..start + self.window_len]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact panics on 0; an empty matrix of width 0 yields nothing
        self.data.chunks_exact(self.window_len.max(1))
    }

    /// The flat row-major buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Append rows `range` of `other` to this matrix.
    pub fn extend_rows(&mut self, other: &WindowMatrix, range: std::ops::Range<usize>) {
        debug_assert_eq!(self.window_len, other.window_len);
        let start = range.start * other.window_len;
        let end = range.end * other.window_len;
        self.data.extend_from_slice(&other.data[start..end]);
    }

    /// A new matrix whose row `k` is row `order[k]` of this one.
    pub fn permuted(&self, order: &[usize]) -> WindowMatrix {
        let mut data = Vec::with_capacity(self.data.len());
        for &src in order {
            data.extend_from_slice(self.row(src));
        }
        WindowMatrix {
            window_len: self.window_len,
            data,
        }
    }
}

/// Number of complete windows of `window_len` that fit in `len` samples.
pub fn complete_windows(len: usize, window_len: usize) -> usize {
    if window_len == 0 {
        0
    } else {
        len / window_len
    }
}

/// Number of leading windows that go to the training partition.
pub fn split_point(n_windows: usize, test_ratio: f64) -> usize {
    let n_train = (n_windows as f64 * (1.0 - test_ratio)).floor() as usize;
    n_train.min(n_windows)
}

/// One recording's windows cut into a training prefix and a testing suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSplit {
    pub windows: WindowMatrix,
    pub n_train: usize,
    pub discarded: usize,
}

impl RecordingSplit {
    pub fn new(signal: &[f64], window_len: usize, test_ratio: f64) -> Self {
        let windows = WindowMatrix::from_signal(signal, window_len);
        let n_train = split_point(windows.rows(), test_ratio);
        let discarded = signal.len() - windows.rows() * window_len;
        Self {
            windows,
            n_train,
            discarded,
        }
    }

    pub fn n_test(&self) -> usize {
        self.windows.rows() - self.n_train
    }

    pub fn train_rows(&self) -> std::ops::Range<usize> {
        0..self.n_train
    }

    pub fn test_rows(&self) -> std::ops::Range<usize> {
        self.n_train..self.windows.rows()
    }
}
