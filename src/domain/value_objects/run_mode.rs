use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::one_of_error;
use crate::common::error::BulkerError;

/// Execution strategy used by the runner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// One repository at a time, in registry order
    Sequential,
    /// One task per repository
    #[default]
    Parallel,
}

impl RunMode {
    pub const VARIANTS: &'static [&'static str] = &["sequential", "parallel"];
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Sequential => write!(f, "sequential"),
            RunMode::Parallel => write!(f, "parallel"),
        }
    }
}

impl FromStr for RunMode {
    type Err = BulkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(RunMode::Sequential),
            "parallel" => Ok(RunMode::Parallel),
            _ => Err(one_of_error("run mode", s, Self::VARIANTS)),
        }
    }
}
