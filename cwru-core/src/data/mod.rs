//! Recording acquisition: local cache, HTTP download, MAT signal extraction

pub mod acquire;
pub mod cache;
pub mod http;
pub mod mat;
pub mod provider;
pub mod source;

pub use acquire::{Acquirer, AcquisitionSummary};
pub use cache::{default_data_dir, CacheStatus, RecordingCache};
pub use http::{HttpFetcher, RetryPolicy};
pub use mat::{read_drive_end_signal, select_drive_end_channel, MalformedRecording};
pub use provider::{AcquisitionError, AcquisitionProgress, LogProgress, RecordingFetcher};
pub use source::{MatSignalSource, MemorySignalSource, SignalError, SignalSource};
