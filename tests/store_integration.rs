//! Integration tests: ConfigStore against a real config folder
//!
//! These tests drive the public API the GUI shell uses (reload → mutate →
//! save_state, create_profile) through `LocalFs` in a temp directory, plus
//! a `MemoryFs` store for lock contention that a real disk can't fake.
//!
//! Run with: RUST_LOG=eqtoggle_lib=debug cargo test

use std::fs;
use std::path::Path;

use eqtoggle_lib::adapters::MemoryFs;
use eqtoggle_lib::domain::{FormatErrorKind, OpenMode, CONFIG_FILE_NAME};
use eqtoggle_lib::{ConfigError, ConfigStore, PreampState, Profile, RetryPolicy, StoreConfig};
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Temp config folder seeded with `config.txt` content.
fn seeded_folder(config: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), config).unwrap();
    dir
}

fn local_store(dir: &TempDir) -> ConfigStore {
    ConfigStore::local(StoreConfig::new(dir.path()).with_retry(RetryPolicy::immediate(5)))
}

fn read_config(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap()
}

fn profile_list(store: &ConfigStore) -> Vec<(String, bool)> {
    store
        .profiles()
        .iter()
        .map(|p| (p.name.clone(), p.enabled))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// The shell's "apply" flow: select one profile, change the preamp, save.
#[test]
fn toggle_and_save_rewrites_markers_in_place() {
    init_logging();
    let dir = seeded_folder("Preamp: -3.5 dB\nInclude: A.txt\n#Include: B.txt\nInclude: C.txt\n");
    let mut store = local_store(&dir);

    store.reload().unwrap();
    assert_eq!(
        profile_list(&store),
        vec![
            ("A.txt".to_string(), true),
            ("B.txt".to_string(), false),
            ("C.txt".to_string(), true),
        ]
    );
    assert!(store.has_multiple_enabled());

    store.select_profile(1);
    store.set_preamp_gain(-7.3, false);
    store.save_state().unwrap();

    assert_eq!(
        read_config(&dir),
        "#Preamp: -7.3 dB\n#Include: A.txt\nInclude: B.txt\n#Include: C.txt\n"
    );
}

/// reload → save_state → reload is stable, including odd spacing and case
/// in the source file, which are normalised on the first save.
#[test]
fn round_trip_is_idempotent() {
    init_logging();
    let dir = seeded_folder(
        "\n#Preamp: 2.0dB\n\n include:  Bass.txt \n#  INCLUDE: Vocal Boost.txt\nInclude: C:/EQ/x.txt\n",
    );
    let mut store = local_store(&dir);

    store.reload().unwrap();
    let first = (store.preamp(), store.profiles().to_vec());
    assert_eq!(first.0, PreampState { gain: 2.0, enabled: false });

    store.save_state().unwrap();
    let saved = read_config(&dir);
    store.reload().unwrap();
    assert_eq!((store.preamp(), store.profiles().to_vec()), first);

    store.save_state().unwrap();
    assert_eq!(read_config(&dir), saved);
}

/// Multiple enabled profiles are persisted as-is; the model never forces
/// single selection.
#[test]
fn several_enabled_profiles_survive_save() {
    let dir = seeded_folder("#Include: A.txt\n#Include: B.txt\n");
    let mut store = local_store(&dir);
    store.reload().unwrap();

    store.set_profile_enabled(0, true);
    store.set_profile_enabled(1, true);
    store.save_state().unwrap();
    store.reload().unwrap();

    assert_eq!(store.enabled_profiles().count(), 2);
}

/// An unknown line fails the reload and leaves nothing behind.
#[test]
fn unknown_line_rejects_whole_file() {
    let dir = seeded_folder("Preamp: 1.0 dB\nInclude: A.txt\nFoo: bar\n");
    let mut store = local_store(&dir);

    let err = store.reload().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Format {
            line_number: 3,
            kind: FormatErrorKind::UnknownDirective,
            ..
        }
    ));
    assert!(err.to_string().contains("Foo: bar"));
    assert!(store.profiles().is_empty());
    assert_eq!(store.preamp(), PreampState::default());
}

#[test]
fn blank_file_with_trailing_newline_loads_empty() {
    let dir = seeded_folder("\n\n");
    let mut store = local_store(&dir);
    store.reload().unwrap();
    assert!(store.profiles().is_empty());
    assert_eq!(store.preamp(), PreampState::default());
}

#[test]
fn missing_folder_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ConfigStore::local(StoreConfig::new(dir.path().join("absent")));
    assert!(matches!(
        store.reload(),
        Err(ConfigError::Open {
            mode: OpenMode::Read,
            ..
        })
    ));
}

/// Saving into a folder that doesn't exist fails without retrying.
#[test]
fn save_into_missing_folder_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = ConfigStore::local(StoreConfig::new(dir.path().join("absent")));
    assert!(matches!(
        store.save_state(),
        Err(ConfigError::Open {
            mode: OpenMode::Truncate,
            ..
        })
    ));
}

/// The shell's "Create new EQ" flow: create, reload, find the new entry
/// disabled, and get a path an editor can open.
#[test]
fn create_profile_then_reload_shows_disabled_entry() {
    init_logging();
    let dir = seeded_folder("Preamp: 0.0 dB\nInclude: Flat.txt\n");
    let mut store = local_store(&dir);
    store.reload().unwrap();

    let path = store.create_profile("  Night Mode ").unwrap();
    assert_eq!(path, dir.path().join("Night Mode.txt"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "");

    store.reload().unwrap();
    assert_eq!(
        store.profiles().last(),
        Some(&Profile::new("Night Mode.txt", false))
    );

    // Second call is a no-op for config.txt and returns the same path
    let again = store.create_profile("Night Mode").unwrap();
    assert_eq!(again, path);
    assert_eq!(
        read_config(&dir),
        "Preamp: 0.0 dB\nInclude: Flat.txt\n#Include: Night Mode.txt\n"
    );
}

#[test]
fn create_profile_keeps_existing_profile_content() {
    let dir = seeded_folder("");
    let profile = dir.path().join("Bass.txt");
    fs::write(&profile, "Filter: ON LS Fc 105 Hz Gain 6 dB\n").unwrap();

    let store = local_store(&dir);
    assert_eq!(store.create_profile("Bass.txt").unwrap(), profile);
    assert_eq!(
        fs::read_to_string(&profile).unwrap(),
        "Filter: ON LS Fc 105 Hz Gain 6 dB\n"
    );
    assert_eq!(read_config(&dir), "#Include: Bass.txt\n");
}

/// The audio engine briefly holding config.txt must not fail a save.
#[test]
fn save_survives_transient_lock() {
    init_logging();
    let folder = Path::new("/eq");
    let config_path = folder.join(CONFIG_FILE_NAME);
    let fs = MemoryFs::new().with_file(&config_path, "Include: A.txt\n");
    let mut store = ConfigStore::new(
        StoreConfig::new(folder).with_retry(RetryPolicy::immediate(5)),
        Box::new(fs.clone()),
    );
    store.reload().unwrap();

    fs.lock_next_opens(3);
    store.set_preamp_gain(1.5, true);
    store.save_state().unwrap();

    // 1 read + 3 locked writes + 1 successful write
    assert_eq!(fs.open_attempts(), 5);
    assert_eq!(
        fs.contents(&config_path).unwrap(),
        "Preamp: 1.5 dB\nInclude: A.txt\n"
    );
}

#[test]
fn persistent_lock_fails_after_policy_attempts() {
    let folder = Path::new("/eq");
    let fs = MemoryFs::new();
    let store = ConfigStore::new(
        StoreConfig::new(folder).with_retry(RetryPolicy::immediate(3)),
        Box::new(fs.clone()),
    );

    fs.lock_next_opens(usize::MAX);
    assert!(matches!(
        store.create_profile("Bass"),
        Err(ConfigError::Open {
            mode: OpenMode::Append,
            ..
        })
    ));
    assert_eq!(fs.open_attempts(), 3);
}
