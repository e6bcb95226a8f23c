//! Configuration loading and parsing.
//!
//! Parses `tessel.toml` (or an override path supplied by the binary). Every
//! section is optional and unknown fields are ignored so older files keep
//! working. Loading never fails: a missing file yields defaults silently, a
//! malformed one yields defaults plus a warning.
//!
//! Numeric options are clamped into their legal ranges by
//! [`Config::apply_limits`]; the raw parsed values stay in `file` and the
//! clamped ones land in `effective`. Each clamp is logged at INFO on target
//! `config`.
//!
//! `[[bindings]]` entries are validated separately by
//! [`Config::resolve_bindings`] because only the caller knows the command set.

use core_keymap::{BindingTable, KeyParseError, parse_sequence};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{fs, io};
use tracing::{debug, info, warn};

pub const CONFIG_FILE_NAME: &str = "tessel.toml";
const APP_DIR: &str = "tessel";

pub const RESERVED_ROWS_MAX: u16 = 4;
pub const QUEUE_CAPACITY_MIN: usize = 16;
pub const QUEUE_CAPACITY_MAX: usize = 65_536;
pub const TICK_HZ_MIN: u32 = 1;
pub const TICK_HZ_MAX: u32 = 240;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("binding `{keys}` names unknown command `{command}`")]
    UnknownCommand { keys: String, command: String },
    #[error("binding `{keys}` has invalid keys: {source}")]
    InvalidKeys {
        keys: String,
        #[source]
        source: KeyParseError,
    },
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Rows each window reserves for its status and prompt lines.
    #[serde(default = "LayoutConfig::default_reserved_rows")]
    pub reserved_rows: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            reserved_rows: Self::default_reserved_rows(),
        }
    }
}

impl LayoutConfig {
    const fn default_reserved_rows() -> u16 {
        2
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    #[serde(default)]
    pub line_wrap: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    /// New panes show the document of the pane they were split from.
    #[serde(default = "SplitConfig::default_share_buffer")]
    pub share_buffer: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            share_buffer: Self::default_share_buffer(),
        }
    }
}

impl SplitConfig {
    const fn default_share_buffer() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct InputConfig {
    #[serde(default = "InputConfig::default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            queue_capacity: Self::default_queue_capacity(),
        }
    }
}

impl InputConfig {
    const fn default_queue_capacity() -> usize {
        1024
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    #[serde(default = "RuntimeConfig::default_tick_hz")]
    pub tick_hz: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_hz: Self::default_tick_hz(),
        }
    }
}

impl RuntimeConfig {
    const fn default_tick_hz() -> u32 {
        60
    }
}

/// One `[[bindings]]` entry: `keys = "C-x 3"`, `command = "split-vertical"`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BindingEntry {
    pub keys: String,
    pub command: String,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub split: SplitConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub bindings: Vec<BindingEntry>,
}

/// Clamped values actually used by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effective {
    pub reserved_rows: u16,
    pub queue_capacity: usize,
    pub tick_hz: u32,
}

impl Default for Effective {
    fn default() -> Self {
        let file = ConfigFile::default();
        Self {
            reserved_rows: file.layout.reserved_rows,
            queue_capacity: file.input.queue_capacity,
            tick_hz: file.runtime.tick_hz,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,     // original file string (optional)
    pub path: Option<PathBuf>,   // file the values came from
    pub file: ConfigFile,        // parsed (or default) data
    pub effective: Effective,    // clamped view of `file`
}

/// Config path following `--config`, then `./tessel.toml`, then the platform
/// config directory (XDG / AppData Roaming).
pub fn discover(cli: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli {
        return path;
    }
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join(APP_DIR).join(CONFIG_FILE_NAME);
    }
    local
}

/// Strict load: read and parse `path`, reporting failures.
pub fn read_file(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file = toml::from_str::<ConfigFile>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let mut cfg = Config {
        raw: Some(content),
        path: Some(path.to_path_buf()),
        file,
        effective: Effective::default(),
    };
    cfg.apply_limits();
    Ok(cfg)
}

/// Lenient load used at startup: falls back to defaults on any failure.
pub fn load_from(path: Option<PathBuf>) -> Config {
    let path = discover(path);
    match read_file(&path) {
        Ok(cfg) => {
            info!(target: "config", path = %path.display(), "config loaded");
            cfg
        }
        Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            debug!(target: "config", path = %path.display(), "no config file, using defaults");
            Config::default()
        }
        Err(e) => {
            warn!(target: "config", error = %e, "config unusable, using defaults");
            Config::default()
        }
    }
}

impl Config {
    /// Clamp raw values into `effective`. Returns true if anything was clamped.
    pub fn apply_limits(&mut self) -> bool {
        let mut clamped_any = false;

        let raw = self.file.layout.reserved_rows;
        let clamped = raw.min(RESERVED_ROWS_MAX);
        if clamped != raw {
            info!(target: "config", raw, clamped, max = RESERVED_ROWS_MAX, "layout_reserved_rows_clamped");
            clamped_any = true;
        }
        self.effective.reserved_rows = clamped;

        let raw = self.file.input.queue_capacity;
        let clamped = raw.clamp(QUEUE_CAPACITY_MIN, QUEUE_CAPACITY_MAX);
        if clamped != raw {
            info!(
                target: "config",
                raw,
                clamped,
                min = QUEUE_CAPACITY_MIN,
                max = QUEUE_CAPACITY_MAX,
                "input_queue_capacity_clamped"
            );
            clamped_any = true;
        }
        self.effective.queue_capacity = clamped;

        let raw = self.file.runtime.tick_hz;
        let clamped = raw.clamp(TICK_HZ_MIN, TICK_HZ_MAX);
        if clamped != raw {
            info!(target: "config", raw, clamped, min = TICK_HZ_MIN, max = TICK_HZ_MAX, "runtime_tick_hz_clamped");
            clamped_any = true;
        }
        self.effective.tick_hz = clamped;

        clamped_any
    }

    /// Validate `[[bindings]]` into a table using `lookup` to resolve command
    /// names. Invalid entries are skipped, logged and returned as errors; the
    /// table keeps file order.
    pub fn resolve_bindings<C, F>(&self, lookup: F) -> (BindingTable<C>, Vec<ConfigError>)
    where
        F: Fn(&str) -> Option<C>,
    {
        let mut table = BindingTable::new();
        let mut errors = Vec::new();
        for entry in &self.file.bindings {
            let keys = match parse_sequence(&entry.keys) {
                Ok(keys) => keys,
                Err(source) => {
                    errors.push(ConfigError::InvalidKeys {
                        keys: entry.keys.clone(),
                        source,
                    });
                    continue;
                }
            };
            let Some(command) = lookup(&entry.command) else {
                errors.push(ConfigError::UnknownCommand {
                    keys: entry.keys.clone(),
                    command: entry.command.clone(),
                });
                continue;
            };
            table.bind_chords(keys, command);
        }
        for e in &errors {
            warn!(target: "config", error = %e, "binding skipped");
        }
        (table, errors)
    }
}
