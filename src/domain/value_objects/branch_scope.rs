use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::one_of_error;
use crate::common::error::BulkerError;

/// Which branches `git branches list` reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchScope {
    #[default]
    Local,
    Remote,
    All,
}

impl BranchScope {
    pub const VARIANTS: &'static [&'static str] = &["local", "remote", "all"];

    /// Extra flag passed to `git branch`
    pub fn git_flag(&self) -> Option<&'static str> {
        match self {
            BranchScope::Local => None,
            BranchScope::Remote => Some("--remotes"),
            BranchScope::All => Some("--all"),
        }
    }
}

impl fmt::Display for BranchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchScope::Local => write!(f, "local"),
            BranchScope::Remote => write!(f, "remote"),
            BranchScope::All => write!(f, "all"),
        }
    }
}

impl FromStr for BranchScope {
    type Err = BulkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(BranchScope::Local),
            "remote" => Ok(BranchScope::Remote),
            "all" => Ok(BranchScope::All),
            _ => Err(one_of_error("branch scope", s, Self::VARIANTS)),
        }
    }
}
