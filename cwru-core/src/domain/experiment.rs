//! Experiment families and motor speeds of the CWRU test rig.

use super::request::InvalidConfiguration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which bearing / sampling-rate experiment a recording belongs to.
///
/// `NormalBaseline` is the healthy reference class. It exists at every speed
/// and is pulled into every selection, but it cannot be requested on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExperimentFamily {
    #[serde(rename = "12DriveEndFault")]
    DriveEnd12k,
    #[serde(rename = "12FanEndFault")]
    FanEnd12k,
    #[serde(rename = "48DriveEndFault")]
    DriveEnd48k,
    #[serde(rename = "NormalBaseline")]
    NormalBaseline,
}

impl ExperimentFamily {
    /// Families a caller may ask for.
    pub const REQUESTABLE: [ExperimentFamily; 3] = [
        ExperimentFamily::DriveEnd12k,
        ExperimentFamily::FanEnd12k,
        ExperimentFamily::DriveEnd48k,
    ];

    /// The tag used in the catalog and in the on-disk cache layout.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperimentFamily::DriveEnd12k => "12DriveEndFault",
            ExperimentFamily::FanEnd12k => "12FanEndFault",
            ExperimentFamily::DriveEnd48k => "48DriveEndFault",
            ExperimentFamily::NormalBaseline => "NormalBaseline",
        }
    }

    pub fn is_baseline(&self) -> bool {
        matches!(self, ExperimentFamily::NormalBaseline)
    }

    /// Parse a family tag that a caller is allowed to request.
    ///
    /// Rejects unknown tags and the baseline family.
    pub fn parse_requestable(s: &str) -> Result<Self, InvalidConfiguration> {
        let family: ExperimentFamily = s.parse()?;
        if family.is_baseline() {
            return Err(InvalidConfiguration::BaselineNotRequestable);
        }
        Ok(family)
    }
}

impl FromStr for ExperimentFamily {
    type Err = InvalidConfiguration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "12DriveEndFault" => Ok(ExperimentFamily::DriveEnd12k),
            "12FanEndFault" => Ok(ExperimentFamily::FanEnd12k),
            "48DriveEndFault" => Ok(ExperimentFamily::DriveEnd48k),
            "NormalBaseline" => Ok(ExperimentFamily::NormalBaseline),
            other => Err(InvalidConfiguration::UnknownFamily(other.to_string())),
        }
    }
}

impl fmt::Display for ExperimentFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Motor speed, one per motor load (0 to 3 hp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rpm {
    #[serde(rename = "1797")]
    R1797,
    #[serde(rename = "1772")]
    R1772,
    #[serde(rename = "1750")]
    R1750,
    #[serde(rename = "1730")]
    R1730,
}

impl Rpm {
    pub const ALL: [Rpm; 4] = [Rpm::R1797, Rpm::R1772, Rpm::R1750, Rpm::R1730];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rpm::R1797 => "1797",
            Rpm::R1772 => "1772",
            Rpm::R1750 => "1750",
            Rpm::R1730 => "1730",
        }
    }
}

impl FromStr for Rpm {
    type Err = InvalidConfiguration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1797" => Ok(Rpm::R1797),
            "1772" => Ok(Rpm::R1772),
            "1750" => Ok(Rpm::R1750),
            "1730" => Ok(Rpm::R1730),
            other => Err(InvalidConfiguration::UnknownRpm(other.to_string())),
        }
    }
}

impl fmt::Display for Rpm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
