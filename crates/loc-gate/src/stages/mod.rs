//! Built-in gate stages.

pub mod precondition;
pub mod role;

pub use precondition::PreconditionStage;
pub use role::RoleStage;
