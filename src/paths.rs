// Environment variables and configuration file locations

use std::env;
use std::path::PathBuf;
use std::sync::LazyLock;

pub const ENV_CONFIG: &str = "EV_JOY_REMAP_CONFIG";
pub const ENV_ENABLE: &str = "EV_JOY_REMAP_ENABLE";
pub const ENV_LOG: &str = "EV_JOY_REMAP_LOG";
pub const ENV_LOG_LEVEL: &str = "EV_JOY_REMAP_LOG_LEVEL";

pub const CONFIG_FILE_NAME: &str = "ev_joy_remap.conf";

/// Non-blank value of an environment variable.
pub fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

pub static PATH_HOME: LazyLock<Option<PathBuf>> =
    LazyLock::new(|| env_value("HOME").map(PathBuf::from));

/// Files tried in order; an explicit `EV_JOY_REMAP_CONFIG` replaces the whole list.
pub static CONFIG_CANDIDATES: LazyLock<Vec<PathBuf>> =
    LazyLock::new(|| config_candidates(env_value(ENV_CONFIG), PATH_HOME.clone()));

pub fn config_candidates(explicit: Option<String>, home: Option<PathBuf>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![PathBuf::from(path)];
    }
    let mut candidates = vec![PathBuf::from(".").join(CONFIG_FILE_NAME)];
    if let Some(home) = home {
        candidates.push(home.join(".config").join(CONFIG_FILE_NAME));
    }
    candidates.push(PathBuf::from("/etc").join(CONFIG_FILE_NAME));
    candidates
}
