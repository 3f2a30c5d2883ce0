pub mod registry;
pub mod repository;

pub use registry::{MembershipChange, Registry};
pub use repository::{Group, Repository};
