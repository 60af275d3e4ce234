//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Chat completion over HTTP (OpenAI-compatible endpoints)
//! - An in-process mock client for offline runs and tests

pub mod adapter;

pub use adapter::*;
