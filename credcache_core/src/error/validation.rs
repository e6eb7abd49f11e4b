//! Cache configuration errors

use thiserror::Error;

/// A cache configuration no backend can work with
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required name in the cache configuration is blank
    #[error("Cache setting '{setting}' must not be empty")]
    EmptySetting { setting: &'static str },

    /// No directory for the local credential file could be resolved
    #[error("No directory for the local credential file; set {env_var} or cache.directory")]
    NoCacheDirectory { env_var: &'static str },
}

impl ValidationError {
    /// Blank `setting`, e.g. `driver_id`
    pub fn empty_setting(setting: &'static str) -> Self {
        Self::EmptySetting { setting }
    }

    pub fn no_cache_directory(env_var: &'static str) -> Self {
        Self::NoCacheDirectory { env_var }
    }
}
