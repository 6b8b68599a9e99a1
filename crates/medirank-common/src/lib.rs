//! medirank-common: Shared error types used across all Medirank crates.

pub mod error;

pub use error::{ApiError, ErrorBody, MedirankError};
