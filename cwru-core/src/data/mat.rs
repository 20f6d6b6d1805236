//! Drive-end signal extraction from CWRU MAT (level 5) files.
//!
//! Each file holds several named variables (`X118_DE_time`, `X118_FE_time`,
//! `X118_BA_time`, `X118RPM`). The drive-end accelerometer channel is the one
//! whose name contains `DE_time`.

use crate::domain::RecordingDescriptor;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// Marker identifying the drive-end accelerometer channel.
pub const DRIVE_END_MARKER: &str = "DE_time";

/// A recording file that cannot yield exactly one drive-end signal.
#[derive(Debug, Error)]
pub enum MalformedRecording {
    #[error("open: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a readable MAT file: {0}")]
    Parse(String),

    #[error("no variable containing 'DE_time'")]
    MissingChannel,

    #[error("several variables contain 'DE_time': {}", .candidates.join(", "))]
    AmbiguousChannel { candidates: Vec<String> },

    #[error("channel '{channel}' is not floating point")]
    UnsupportedClass { channel: String },
}

/// Pick the drive-end channel among a file's variable names.
///
/// Exactly one `DE_time` variable is used as-is. Some files also carry the
/// channel of a neighbouring recording; in that case the one prefixed with
/// this file's number (`X099_` for `99.mat`) wins.
pub fn select_drive_end_channel<'a>(
    names: &[&'a str],
    file_number: Option<u32>,
) -> Result<&'a str, MalformedRecording> {
    let candidates: Vec<&'a str> = names
        .iter()
        .copied()
        .filter(|n| n.contains(DRIVE_END_MARKER))
        .collect();

    match candidates.as_slice() {
        [] => Err(MalformedRecording::MissingChannel),
        [only] => Ok(*only),
        _ => {
            let own = file_number.map(|n| format!("X{n:03}_"));
            let matching: Vec<&'a str> = match own {
                Some(prefix) => candidates
                    .iter()
                    .copied()
                    .filter(|c| c.starts_with(&prefix))
                    .collect(),
                None => Vec::new(),
            };
            match matching.as_slice() {
                [only] => Ok(*only),
                _ => Err(MalformedRecording::AmbiguousChannel {
                    candidates: candidates.iter().map(|c| c.to_string()).collect(),
                }),
            }
        }
    }
}

/// First column of a 2-D MATLAB array stored column-major.
///
/// A vector (either dimension 1) is returned whole.
fn first_column<T: Copy>(real: &[T], size: &[usize]) -> Vec<T> {
    let rows = match size {
        [r, c] if *r == 1 || *c == 1 => real.len(),
        [r, ..] => *r,
        [] => 0,
    };
    real[..rows.min(real.len())].to_vec()
}

/// Read the drive-end time series of one recording.
pub fn read_drive_end_signal(
    path: &Path,
    recording: &RecordingDescriptor,
) -> Result<Vec<f64>, MalformedRecording> {
    let reader = BufReader::new(File::open(path)?);
    let mat = matfile::MatFile::parse(reader).map_err(|e| MalformedRecording::Parse(e.to_string()))?;

    let names: Vec<&str> = mat.arrays().iter().map(|a| a.name()).collect();
    let channel = select_drive_end_channel(&names, recording.file_number())?;

    let array = mat
        .arrays()
        .iter()
        .find(|a| a.name() == channel)
        .ok_or(MalformedRecording::MissingChannel)?;

    match array.data() {
        matfile::NumericData::Double { real, .. } => Ok(first_column(real, array.size())),
        matfile::NumericData::Single { real, .. } => Ok(first_column(real, array.size())
            .into_iter()
            .map(f64::from)
            .collect()),
        _ => Err(MalformedRecording::UnsupportedClass {
            channel: channel.to_string(),
        }),
    }
}
