// ids.rs
use std::fmt;
use std::str::FromStr;

use onboard_core::FlowId;
use serde::{Deserialize, Serialize};

use crate::DomainError;

pub const LOCAL: &str = "local";
pub const FOREIGN: &str = "foreign";
pub const INDIVIDUAL: &str = "individual";
pub const CORPORATE: &str = "corporate";

/// Residencia del solicitante respecto al mercado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Local,
    Foreign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicantType {
    Individual,
    Corporate,
}

impl Region {
    pub const ALL: [Region; 2] = [Region::Local, Region::Foreign];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Local => LOCAL,
            Region::Foreign => FOREIGN,
        }
    }
}

impl ApplicantType {
    pub const ALL: [ApplicantType; 2] = [ApplicantType::Individual, ApplicantType::Corporate];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicantType::Individual => INDIVIDUAL,
            ApplicantType::Corporate => CORPORATE,
        }
    }
}

// El parseo es exacto, igual que la resolución en el registry: "Local" no
// es "local".
impl FromStr for Region {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            LOCAL => Ok(Region::Local),
            FOREIGN => Ok(Region::Foreign),
            other => Err(DomainError::UnknownRegion(other.to_string())),
        }
    }
}

impl FromStr for ApplicantType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            INDIVIDUAL => Ok(ApplicantType::Individual),
            CORPORATE => Ok(ApplicantType::Corporate),
            other => Err(DomainError::UnknownApplicantType(other.to_string())),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ApplicantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn flow_id(region: Region, applicant_type: ApplicantType) -> FlowId {
    FlowId::new(region.as_str(), applicant_type.as_str())
}
