//! Server-side domain models and parameter types.
//!
//! Domain models are stored as documents at the repository boundary and
//! transformed to DTOs at the controller boundary.

pub mod api_key;
pub mod session;
pub mod user;
