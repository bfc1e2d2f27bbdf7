//! ConfigStore: owns the preamp/profile model and syncs it with config.txt.
//!
//! Pure line translation lives in `codec`. The store handles file access,
//! line numbering for errors, and the bounded open-retry on writes.
//!
//! Single owner, single thread: nothing here locks the model, and every
//! call blocks on the filesystem.

use std::io::{self, BufRead, Write};
use std::path::{Component, Path, PathBuf};

use crate::adapters::LocalFs;
use crate::codec::{decode, encode_document, encode_profile, Directive};
use crate::domain::{
    ConfigError, ConfigResult, OpenMode, PreampState, Profile, StoreConfig, CONFIG_FILE_NAME,
};
use crate::ports::FileSystem;

/// Extension appended to new profile names that lack it.
const PROFILE_EXTENSION: &str = ".txt";

const UTF8_BOM: char = '\u{feff}';

/// In-memory view of config.txt.
///
/// The model permits any number of enabled profiles, zero and several
/// included: the file format allows it, so radio-style exclusivity is left to
/// the caller (see [`select_profile`](Self::select_profile)).
pub struct ConfigStore {
    fs: Box<dyn FileSystem>,
    config: StoreConfig,
    profiles: Vec<Profile>,
    preamp: PreampState,
}

impl ConfigStore {
    /// Create an empty store. Nothing is read until [`reload`](Self::reload).
    pub fn new(config: StoreConfig, fs: Box<dyn FileSystem>) -> Self {
        Self {
            fs,
            config,
            profiles: Vec::new(),
            preamp: PreampState::default(),
        }
    }

    /// Store backed by the real disk.
    pub fn local(config: StoreConfig) -> Self {
        Self::new(config, Box::new(LocalFs))
    }

    /// Store backed by the real disk, folder taken from `EQAPO_CONFIG_DIR`
    /// when set.
    pub fn from_env() -> Self {
        Self::local(StoreConfig::from_env())
    }

    /// Replace the model with the contents of config.txt.
    ///
    /// On any error the model is left empty with a default preamp; nothing
    /// from the previous load survives either way.
    pub fn reload(&mut self) -> ConfigResult<()> {
        self.profiles.clear();
        self.preamp = PreampState::default();

        let (preamp, profiles) = self.read_model()?;
        log::debug!(
            "Loaded {} profiles ({} enabled) from {}",
            profiles.len(),
            profiles.iter().filter(|p| p.enabled).count(),
            self.config_file_path().display()
        );

        self.preamp = preamp;
        self.profiles = profiles;
        Ok(())
    }

    fn read_model(&self) -> ConfigResult<(PreampState, Vec<Profile>)> {
        let path = self.config_file_path();
        let reader = self.fs.open_read(&path).map_err(|source| ConfigError::Open {
            path: path.clone(),
            mode: OpenMode::Read,
            source,
        })?;

        let mut preamp = PreampState::default();
        let mut profiles = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            // Notepad saves UTF-8 with a BOM
            let line = if index == 0 {
                line.trim_start_matches(UTF8_BOM)
            } else {
                line.as_str()
            };

            match decode(line) {
                Ok(None) => {}
                // Last preamp line wins; every include is its own profile
                Ok(Some(Directive::Preamp(p))) => preamp = p,
                Ok(Some(Directive::Include(p))) => profiles.push(p),
                Err(kind) => {
                    return Err(ConfigError::Format {
                        line_number: index + 1,
                        line: line.trim().to_string(),
                        kind,
                    })
                }
            }
        }

        Ok((preamp, profiles))
    }

    /// Folder holding config.txt and the profile files.
    pub fn config_folder(&self) -> &Path {
        &self.config.config_folder
    }

    pub fn config_file_path(&self) -> PathBuf {
        self.config.config_folder.join(CONFIG_FILE_NAME)
    }

    /// Where a file referenced from config.txt lives, for opening it in an
    /// editor.
    ///
    /// Names with a drive colon or an absolute path are taken as-is; anything
    /// else is relative to the config folder. `create_profile` does not use
    /// this: new profiles always land inside the config folder.
    pub fn resolve_path(&self, file_name: &str) -> PathBuf {
        if file_name.contains(':') || Path::new(file_name).is_absolute() {
            PathBuf::from(file_name)
        } else {
            self.config.config_folder.join(file_name)
        }
    }

    /// Profiles in file order. Invalidated by the next `reload`.
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn preamp(&self) -> PreampState {
        self.preamp
    }

    pub fn enabled_profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter().filter(|p| p.enabled)
    }

    /// True when more than one include is active, which the engine applies
    /// cumulatively. Shells may want to warn about it.
    pub fn has_multiple_enabled(&self) -> bool {
        self.enabled_profiles().nth(1).is_some()
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range for [`profiles`](Self::profiles).
    pub fn set_profile_enabled(&mut self, index: usize, enabled: bool) {
        self.assert_index(index);
        self.profiles[index].enabled = enabled;
    }

    /// Enable the profile at `index` and disable every other one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for [`profiles`](Self::profiles).
    pub fn select_profile(&mut self, index: usize) {
        self.assert_index(index);
        for (i, profile) in self.profiles.iter_mut().enumerate() {
            profile.enabled = i == index;
        }
    }

    /// Overwrite both preamp fields. No range check.
    ///
    /// `gain` must be finite: `Preamp: NaN dB` would be written out and then
    /// rejected by the next `reload`. Debug builds assert it.
    pub fn set_preamp_gain(&mut self, gain: f64, enabled: bool) {
        debug_assert!(gain.is_finite(), "preamp gain must be finite, got {gain}");
        self.preamp = PreampState { gain, enabled };
    }

    fn assert_index(&self, index: usize) {
        assert!(
            index < self.profiles.len(),
            "profile index {index} out of range ({} profiles loaded)",
            self.profiles.len()
        );
    }

    /// Create an empty profile file and register it in config.txt as a
    /// disabled include.
    ///
    /// `name` gets a `.txt` suffix unless it already ends in one (any case).
    /// The file is always placed inside the config folder; absolute names and
    /// names that climb out with `..` are rejected as `InvalidName`.
    /// An existing profile file is left untouched. If a loaded profile already
    /// has the same file name (case-insensitive), config.txt is not written.
    /// The in-memory list is not updated; call [`reload`](Self::reload) to
    /// see the new entry.
    ///
    /// Returns the profile file's path.
    pub fn create_profile(&self, name: &str) -> ConfigResult<PathBuf> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::InvalidName(name.to_string()));
        }

        let file_name = profile_file_name(name);
        let stays_inside = Path::new(&file_name)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !stays_inside {
            return Err(ConfigError::InvalidName(name.to_string()));
        }
        let profile_path = self.config.config_folder.join(&file_name);

        if !self.fs.exists(&profile_path) {
            self.fs
                .create_empty(&profile_path)
                .map_err(|source| ConfigError::Open {
                    path: profile_path.clone(),
                    mode: OpenMode::Create,
                    source,
                })?;
            log::info!("Created profile file {}", profile_path.display());
        }

        let config_path = self.config_file_path();
        let mut writer =
            self.open_with_retry(&config_path, OpenMode::Append, |fs, p| fs.open_append(p))?;

        if self.profiles.iter().any(|p| p.file_name_matches(&file_name)) {
            log::debug!("{file_name} already included, config.txt left unchanged");
            return Ok(profile_path);
        }

        let mut line = encode_profile(&Profile::new(file_name, false));
        line.push('\n');
        write_all_and_flush(&mut *writer, &line).map_err(|source| ConfigError::Io {
            path: config_path,
            source,
        })?;

        Ok(profile_path)
    }

    /// Rewrite config.txt from the model: the preamp line, then one include
    /// per profile in order.
    ///
    /// A failure after the file was opened can leave it truncated.
    pub fn save_state(&self) -> ConfigResult<()> {
        let path = self.config_file_path();
        let document = encode_document(&self.preamp, &self.profiles);

        let mut writer = self.open_with_retry(&path, OpenMode::Truncate, |fs, p| fs.open_truncate(p))?;
        write_all_and_flush(&mut *writer, &document).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        log::debug!("Saved {} profiles to {}", self.profiles.len(), path.display());
        Ok(())
    }

    /// Open for writing under the store's retry policy.
    ///
    /// Another reader (usually the audio engine reacting to the last write)
    /// can hold the file for a moment. A missing folder is not transient and
    /// fails straight away.
    fn open_with_retry<F>(
        &self,
        path: &Path,
        mode: OpenMode,
        open: F,
    ) -> ConfigResult<Box<dyn Write>>
    where
        F: Fn(&dyn FileSystem, &Path) -> io::Result<Box<dyn Write>>,
    {
        let policy = self.config.retry;
        let attempts = policy.attempts();
        let mut attempt = 1;

        loop {
            match open(&*self.fs, path) {
                Ok(writer) => return Ok(writer),
                Err(e) if attempt < attempts && e.kind() != io::ErrorKind::NotFound => {
                    log::warn!(
                        "Opening {} for {mode} failed (attempt {attempt}/{attempts}): {e}",
                        path.display()
                    );
                    std::thread::sleep(policy.delay());
                    attempt += 1;
                }
                Err(source) => {
                    return Err(ConfigError::Open {
                        path: path.to_path_buf(),
                        mode,
                        source,
                    })
                }
            }
        }
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::local(StoreConfig::default())
    }
}

/// `"Bass"` → `"Bass.txt"`, `"Bass.TXT"` unchanged.
fn profile_file_name(name: &str) -> String {
    let has_extension = name.len() >= PROFILE_EXTENSION.len()
        && name.as_bytes()[name.len() - PROFILE_EXTENSION.len()..]
            .eq_ignore_ascii_case(PROFILE_EXTENSION.as_bytes());

    if has_extension {
        name.to_string()
    } else {
        format!("{name}{PROFILE_EXTENSION}")
    }
}

fn write_all_and_flush(writer: &mut dyn Write, text: &str) -> io::Result<()> {
    writer.write_all(text.as_bytes())?;
    writer.flush()
}
