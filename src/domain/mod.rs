//! Domain layer - Pure business abstractions
//!
//! Record types, input validation, repository traits and the domain error.
//! Storage details (text-encoded prices and timestamps) stay in the
//! infrastructure layer.

pub mod errors;
pub mod repositories;
pub mod validation;

pub use errors::DomainError;
pub use repositories::*;
