//! Test data builders

mod document;

pub use document::DocumentBuilder;
