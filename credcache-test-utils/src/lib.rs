//! Test utilities for the credential cache
//!
//! This crate provides mock stores and document builders for testing
//! credential cache functionality without an OS keychain.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::DocumentBuilder;
pub use mocks::{MockCustomStore, MockNativeStore};
