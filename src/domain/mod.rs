//! Core records: repositories, groups, the registry and selection
pub mod entities;
pub mod value_objects;
