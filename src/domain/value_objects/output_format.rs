use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::one_of_error;
use crate::common::error::BulkerError;

/// Output format of the rendered per-repository report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `name: key=value ...` lines (default)
    #[default]
    Line,
    /// JSON array of objects
    Json,
    /// Leveled logfmt records
    Log,
    /// Bordered table
    Table,
}

impl OutputFormat {
    pub const VARIANTS: &'static [&'static str] = &["json", "line", "log", "table"];
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Line => write!(f, "line"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Log => write!(f, "log"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = BulkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "line" => Ok(OutputFormat::Line),
            "json" => Ok(OutputFormat::Json),
            "log" => Ok(OutputFormat::Log),
            "table" => Ok(OutputFormat::Table),
            _ => Err(one_of_error("output format", s, Self::VARIANTS)),
        }
    }
}
