use super::experiment::{ExperimentFamily, Rpm};
use serde::{Deserialize, Serialize};

/// One physical recording listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordingDescriptor {
    pub family: ExperimentFamily,
    pub rpm: Rpm,
    /// Fault descriptor such as `0.007-Ball`, or `Normal` for the baseline.
    pub id: String,
    pub url: String,
}

impl RecordingDescriptor {
    /// File number of the remote MAT file (`.../118.mat` → `118`).
    ///
    /// CWRU variable names embed this number (`X118_DE_time`).
    pub fn file_number(&self) -> Option<u32> {
        let name = self.url.rsplit('/').next()?;
        let stem = name.strip_suffix(".mat")?;
        stem.parse().ok()
    }
}
