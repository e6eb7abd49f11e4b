//! Credential cache command line interface
//!
//! Configuration loading and path helpers shared by the `credcache` binary
//! and its tests.

pub mod config;
pub mod paths;
