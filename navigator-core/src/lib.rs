pub mod calculations;
pub mod guardrails;
pub mod models;
pub mod money;
pub mod provisions;
pub mod registry;

pub use models::*;
pub use registry::{ConfigRegistry, RegistryError};
