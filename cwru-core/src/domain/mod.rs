//! Domain types for the CWRU dataset builder

pub mod experiment;
pub mod ids;
pub mod recording;
pub mod request;

pub use experiment::{ExperimentFamily, Rpm};
pub use ids::DatasetHash;
pub use recording::RecordingDescriptor;
pub use request::{DatasetRequest, InvalidConfiguration, DEFAULT_TEST_RATIO};

/// Class label: index of the source recording in the catalog selection.
pub type Label = usize;
