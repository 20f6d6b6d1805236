//! A validated dataset construction request.

use super::experiment::{ExperimentFamily, Rpm};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fraction of each recording's windows held out for testing unless told otherwise.
pub const DEFAULT_TEST_RATIO: f64 = 0.25;

/// A request parameter outside its allowed set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidConfiguration {
    #[error(
        "wrong experiment name: {0} (expected one of 12DriveEndFault, 12FanEndFault, 48DriveEndFault)"
    )]
    UnknownFamily(String),

    #[error("wrong rpm value: {0} (expected one of 1797, 1772, 1750, 1730)")]
    UnknownRpm(String),

    #[error("NormalBaseline is included in every selection and cannot be requested as a family")]
    BaselineNotRequestable,

    #[error("window length must be positive")]
    ZeroWindowLength,

    #[error("test ratio must be in [0, 1), got {0}")]
    TestRatioOutOfRange(f64),
}

/// Everything that determines the output of a dataset build, apart from the
/// catalog and the cached signal files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRequest {
    pub family: ExperimentFamily,
    pub rpm: Rpm,
    pub window_len: usize,
    pub test_ratio: f64,
}

impl DatasetRequest {
    pub fn new(
        family: ExperimentFamily,
        rpm: Rpm,
        window_len: usize,
        test_ratio: f64,
    ) -> Result<Self, InvalidConfiguration> {
        if family.is_baseline() {
            return Err(InvalidConfiguration::BaselineNotRequestable);
        }
        if window_len == 0 {
            return Err(InvalidConfiguration::ZeroWindowLength);
        }
        if !test_ratio.is_finite() || !(0.0..1.0).contains(&test_ratio) {
            return Err(InvalidConfiguration::TestRatioOutOfRange(test_ratio));
        }
        Ok(Self {
            family,
            rpm,
            window_len,
            test_ratio,
        })
    }

    /// Build a request from the raw string tags a user typed.
    pub fn parse(
        family: &str,
        rpm: &str,
        window_len: usize,
        test_ratio: f64,
    ) -> Result<Self, InvalidConfiguration> {
        let family = ExperimentFamily::parse_requestable(family)?;
        let rpm: Rpm = rpm.parse()?;
        Self::new(family, rpm, window_len, test_ratio)
    }
}
