use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const CONFIG_DIR_ENV: &str = "WEATHER_BACKDROP_CONFIG_DIR";
const STATE_FILE: &str = "state.json";

/// First-run flags that survive restarts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub instructions_shown: bool,
}

/// Reads the persisted state, or defaults when disk access is off or the file
/// is missing or unreadable.
pub fn load_persisted_state(enable_disk: bool) -> (PersistedState, Option<PathBuf>) {
    if !enable_disk {
        return (PersistedState::default(), None);
    }
    let Some(path) = state_path() else {
        return (PersistedState::default(), None);
    };
    (read_state(&path), Some(path))
}

pub fn read_state(path: &Path) -> PersistedState {
    let Ok(content) = fs::read_to_string(path) else {
        return PersistedState::default();
    };
    serde_json::from_str(&content).unwrap_or_else(|err| {
        log::warn!("ignoring corrupt state file {}: {err}", path.display());
        PersistedState::default()
    })
}

pub fn save_persisted_state(path: &Path, state: PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("creating state directory failed")?;
    }
    let payload = serde_json::to_string_pretty(&state).context("serializing state failed")?;
    fs::write(path, payload).context("writing state file failed")
}

pub fn state_path() -> Option<PathBuf> {
    state_path_from(std::env::var_os(CONFIG_DIR_ENV), std::env::var_os("HOME"))
}

fn state_path_from(config_dir: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(base) = config_dir {
        return Some(PathBuf::from(base).join(STATE_FILE));
    }
    Some(
        PathBuf::from(home?)
            .join(".config")
            .join("weather-backdrop")
            .join(STATE_FILE),
    )
}

#[cfg(test)]
mod tests;
