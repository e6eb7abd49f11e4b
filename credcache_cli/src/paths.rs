//! Centralized path management for the credcache CLI

use std::path::PathBuf;

/// The name of the application directory used across all platforms
const APP_DIR: &str = "credcache";

/// The name of the configuration file
const CONFIG_FILE: &str = "config.toml";

/// Environment variable pointing at an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "CREDCACHE_CONFIG";

/// Returns the path to the configuration directory
///
/// On Unix-like systems this honours `XDG_CONFIG_HOME`, then falls back to
/// the platform config directory:
/// - Linux: `~/.config/credcache`
/// - macOS: `~/Library/Application Support/credcache`
/// - Windows: `%APPDATA%\credcache`
///
/// If no standard directory can be determined, `.credcache` in the current
/// directory is used.
pub fn get_config_dir() -> PathBuf {
    #[cfg(not(target_os = "windows"))]
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return PathBuf::from(xdg_config).join(APP_DIR);
    }

    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".credcache"))
}

/// Returns the path to the configuration file
///
/// `$CREDCACHE_CONFIG` wins over the platform location.
pub fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV)
        && !path.is_empty()
    {
        return PathBuf::from(path);
    }

    get_config_dir().join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_contains_app_name() {
        let config_dir = get_config_dir();
        assert!(
            config_dir.to_string_lossy().contains("credcache"),
            "Config dir should contain 'credcache': {}",
            config_dir.display()
        );
    }

    #[test]
    fn test_config_path_has_correct_filename() {
        if std::env::var(CONFIG_PATH_ENV).is_ok() {
            return;
        }

        let config_path = get_config_path();
        assert_eq!(
            config_path.file_name().and_then(|n| n.to_str()),
            Some(CONFIG_FILE)
        );
        assert!(config_path.starts_with(get_config_dir()));
    }
}
