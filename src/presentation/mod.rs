//! Command-line interface and logging setup
pub mod cli;
pub mod logging;
