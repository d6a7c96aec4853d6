use std::ffi::OsString;

use tempfile::NamedTempFile;

use super::{PersistedState, load_persisted_state, read_state, save_persisted_state, state_path_from};

#[test]
fn state_roundtrip_preserves_instructions_flag() {
    let file = NamedTempFile::new().expect("create temp state file");
    let state = PersistedState {
        instructions_shown: true,
    };
    save_persisted_state(file.path(), state).expect("save state");
    assert_eq!(read_state(file.path()), state);
}

#[test]
fn missing_file_reads_as_not_shown() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let state = read_state(&dir.path().join("absent.json"));
    assert!(!state.instructions_shown);
}

#[test]
fn corrupt_file_reads_as_not_shown() {
    let file = NamedTempFile::new().expect("create temp state file");
    std::fs::write(file.path(), "{ not json").expect("write garbage");
    assert_eq!(read_state(file.path()), PersistedState::default());
}

#[test]
fn unknown_fields_and_missing_flag_are_tolerated() {
    let file = NamedTempFile::new().expect("create temp state file");
    std::fs::write(file.path(), r#"{"other": 3}"#).expect("write state");
    assert!(!read_state(file.path()).instructions_shown);
}

#[test]
fn save_creates_parent_directories() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("nested").join("state.json");
    save_persisted_state(&path, PersistedState::default()).expect("save state");
    assert!(path.exists());
}

#[test]
fn disabled_disk_returns_defaults_without_path() {
    let (state, path) = load_persisted_state(false);
    assert!(path.is_none());
    assert!(!state.instructions_shown);
}

#[test]
fn config_dir_override_wins_over_home() {
    let path = state_path_from(
        Some(OsString::from("/tmp/backdrop")),
        Some(OsString::from("/home/me")),
    )
    .expect("path");
    assert!(path.ends_with("backdrop/state.json"));

    let path = state_path_from(None, Some(OsString::from("/home/me"))).expect("path");
    assert!(path.ends_with(".config/weather-backdrop/state.json"));

    assert!(state_path_from(None, None).is_none());
}
