pub mod branch_scope;
pub mod filter;
pub mod output_format;
pub mod run_mode;

pub use branch_scope::BranchScope;
pub use filter::RepoFilter;
pub use output_format::OutputFormat;
pub use run_mode::RunMode;

use crate::common::error::BulkerError;

/// Builds the "must be one of" validation error shared by the enum-like flags.
pub(crate) fn one_of_error(field: &str, value: &str, allowed: &[&str]) -> BulkerError {
    BulkerError::validation_error(
        field,
        format!("'{}' must be one of: {}", value, allowed.join(", ")),
        Some(value.to_string()),
    )
}
