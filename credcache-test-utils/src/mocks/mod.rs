//! Mock implementations for testing

mod custom;
mod native;

pub use custom::MockCustomStore;
pub use native::MockNativeStore;
