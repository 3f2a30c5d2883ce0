//! Error type and result alias shared by every layer
pub mod error;
pub mod result;
