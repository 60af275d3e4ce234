//! # Domain Layer
//!
//! Conversation and configuration models plus the error taxonomy.
//! This layer is independent of the HTTP transport.

mod error;
pub mod models;

pub use error::DomainError;
pub use models::*;
