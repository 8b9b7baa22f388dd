//! Approval policy model and active-policy resolution.

pub mod resolver;
pub mod types;

pub use resolver::PolicyResolver;
pub use types::{ApprovalPolicy, PolicyStep, ResolutionMode, StepRule};
