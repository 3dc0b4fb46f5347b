use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pyscope_domain::{PackageManager, ParsePackageManagerError, ResolutionConfig};
use serde::{Deserialize, Serialize};
use toml_edit::{DocumentMut, TableLike};
use tracing::{debug, warn};

use crate::process::RunLimits;

pub const CONFIG_ENV: &str = "PYSCOPE_CONFIG";
pub const PYTHON_ENV: &str = "PYSCOPE_PYTHON";
pub const ENABLE_VENV_ENV: &str = "PYSCOPE_ENABLE_VENV";
pub const AUTO_DETECT_ENV: &str = "PYSCOPE_AUTO_DETECT_VENV";
pub const PACKAGE_MANAGER_ENV: &str = "PYSCOPE_PACKAGE_MANAGER";
pub const PROBE_TIMEOUT_ENV: &str = "PYSCOPE_PROBE_TIMEOUT_SECS";

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

const PYPROJECT: &str = "pyproject.toml";
const USER_CONFIG_DIR: &str = ".pyscope";
const USER_CONFIG_FILE: &str = "config.toml";

const KEY_PYTHON: &str = "python";
const KEY_ENABLE_VENV: &str = "enable-virtual-env";
const KEY_AUTO_DETECT: &str = "auto-detect-venv";
const KEY_PACKAGE_MANAGER: &str = "package-manager";
const KEY_PROBE_TIMEOUT: &str = "probe-timeout-secs";
const KNOWN_KEYS: [&str; 5] = [
    KEY_PYTHON,
    KEY_ENABLE_VENV,
    KEY_AUTO_DETECT,
    KEY_PACKAGE_MANAGER,
    KEY_PROBE_TIMEOUT,
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalOptions {
    /// Explicit config file; replaces the user and pyproject layers.
    pub config: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    #[must_use]
    pub fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    #[must_use]
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Builds a snapshot from explicit pairs instead of the process env.
    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

/// Values supplied on the command line; they win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub python_command: Option<String>,
    pub enable_virtual_env: Option<bool>,
    pub auto_detect_venv: Option<bool>,
    pub package_manager: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file {} does not exist", .path.display())]
    Missing { path: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },
    #[error("`{key}` in {origin} must be {expected}")]
    InvalidType {
        key: String,
        expected: &'static str,
        origin: String,
    },
    #[error("`{key}` in {origin} must not be empty")]
    Empty { key: String, origin: String },
    #[error("invalid package manager in {origin}: {source}")]
    PackageManager {
        origin: String,
        #[source]
        source: ParsePackageManagerError,
    },
    #[error("`{key}` must be a boolean such as 1/0 or true/false (got `{value}`)")]
    InvalidBool { key: String, value: String },
    #[error("`{key}` must be a positive whole number of seconds (got `{value}`)")]
    InvalidTimeout { key: String, value: String },
}

impl ConfigError {
    #[must_use]
    pub fn hint(&self) -> &'static str {
        match self {
            ConfigError::Missing { .. } => "check the --config path or unset PYSCOPE_CONFIG",
            ConfigError::Read { .. } | ConfigError::Parse { .. } => {
                "fix or remove the configuration file"
            }
            ConfigError::PackageManager { .. } => {
                "use one of pip, poetry, pipenv, uv, conda or auto"
            }
            ConfigError::InvalidType { .. }
            | ConfigError::Empty { .. }
            | ConfigError::InvalidBool { .. }
            | ConfigError::InvalidTimeout { .. } => "correct the value and retry",
        }
    }
}

/// Where a layer of the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigSource {
    Defaults,
    File { path: PathBuf },
    Pyproject { path: PathBuf },
    Environment,
    CommandLine,
}

/// Effective configuration after layering defaults, files, env and flags.
#[derive(Debug, Clone)]
pub struct Settings {
    resolution: ResolutionConfig,
    probe_timeout: Duration,
    sources: Vec<ConfigSource>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolution: ResolutionConfig::default(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            sources: vec![ConfigSource::Defaults],
        }
    }
}

impl Settings {
    #[must_use]
    pub fn resolution(&self) -> &ResolutionConfig {
        &self.resolution
    }

    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    #[must_use]
    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    #[must_use]
    pub fn run_limits(&self) -> RunLimits {
        RunLimits::with_timeout(self.probe_timeout)
    }

    fn apply(&mut self, layer: Layer, source: ConfigSource) {
        if layer.is_empty() {
            return;
        }
        if let Some(python) = layer.python_command {
            self.resolution.python_command = python;
        }
        if let Some(enabled) = layer.enable_virtual_env {
            self.resolution.enable_virtual_env = enabled;
        }
        if let Some(auto) = layer.auto_detect_venv {
            self.resolution.auto_detect_venv = auto;
        }
        if let Some(manager) = layer.package_manager {
            self.resolution.package_manager = manager;
        }
        if let Some(timeout) = layer.probe_timeout {
            self.probe_timeout = timeout;
        }
        debug!(?source, "applied configuration layer");
        self.sources.push(source);
    }
}

#[derive(Debug, Default)]
struct Layer {
    python_command: Option<String>,
    enable_virtual_env: Option<bool>,
    auto_detect_venv: Option<bool>,
    package_manager: Option<PackageManager>,
    probe_timeout: Option<Duration>,
}

impl Layer {
    fn is_empty(&self) -> bool {
        self.python_command.is_none()
            && self.enable_virtual_env.is_none()
            && self.auto_detect_venv.is_none()
            && self.package_manager.is_none()
            && self.probe_timeout.is_none()
    }

    fn from_table(table: &dyn TableLike, origin: &str) -> Result<Self, ConfigError> {
        for (key, _) in table.iter() {
            if !KNOWN_KEYS.contains(&key) {
                warn!(key, origin, "ignoring unknown configuration key");
            }
        }
        let python_command = match string_value(table, KEY_PYTHON, origin)? {
            Some(value) => Some(non_empty(KEY_PYTHON, value, origin)?),
            None => None,
        };
        let package_manager = string_value(table, KEY_PACKAGE_MANAGER, origin)?
            .map(|raw| parse_package_manager(&raw, origin))
            .transpose()?;
        let probe_timeout = match table.get(KEY_PROBE_TIMEOUT) {
            None => None,
            Some(item) => {
                let secs = item.as_integer().ok_or_else(|| ConfigError::InvalidType {
                    key: KEY_PROBE_TIMEOUT.to_string(),
                    expected: "an integer",
                    origin: origin.to_string(),
                })?;
                Some(timeout_from_secs(KEY_PROBE_TIMEOUT, secs)?)
            }
        };
        Ok(Self {
            python_command,
            enable_virtual_env: bool_value(table, KEY_ENABLE_VENV, origin)?,
            auto_detect_venv: bool_value(table, KEY_AUTO_DETECT, origin)?,
            package_manager,
            probe_timeout,
        })
    }

    fn from_env(env: &EnvSnapshot) -> Result<Self, ConfigError> {
        let set = |key: &str| env.var(key).map(str::trim).filter(|value| !value.is_empty());
        let package_manager = set(PACKAGE_MANAGER_ENV)
            .map(|raw| parse_package_manager(raw, PACKAGE_MANAGER_ENV))
            .transpose()?;
        let probe_timeout = set(PROBE_TIMEOUT_ENV)
            .map(|raw| {
                let secs = raw.parse::<i64>().map_err(|_| ConfigError::InvalidTimeout {
                    key: PROBE_TIMEOUT_ENV.to_string(),
                    value: raw.to_string(),
                })?;
                timeout_from_secs(PROBE_TIMEOUT_ENV, secs)
            })
            .transpose()?;
        Ok(Self {
            python_command: set(PYTHON_ENV).map(ToString::to_string),
            enable_virtual_env: set(ENABLE_VENV_ENV)
                .map(|raw| parse_bool(ENABLE_VENV_ENV, raw))
                .transpose()?,
            auto_detect_venv: set(AUTO_DETECT_ENV)
                .map(|raw| parse_bool(AUTO_DETECT_ENV, raw))
                .transpose()?,
            package_manager,
            probe_timeout,
        })
    }

    fn from_overrides(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let origin = "command line";
        let python_command = match overrides.python_command.clone() {
            Some(value) => Some(non_empty("--python", value, origin)?),
            None => None,
        };
        let package_manager = overrides
            .package_manager
            .as_deref()
            .map(|raw| parse_package_manager(raw, origin))
            .transpose()?;
        Ok(Self {
            python_command,
            enable_virtual_env: overrides.enable_virtual_env,
            auto_detect_venv: overrides.auto_detect_venv,
            package_manager,
            probe_timeout: None,
        })
    }
}

/// Assembles [`Settings`] for one command invocation.
pub struct ConfigLoader<'a> {
    env: &'a EnvSnapshot,
    cwd: &'a Path,
    home: Option<PathBuf>,
}

impl<'a> ConfigLoader<'a> {
    #[must_use]
    pub fn new(env: &'a EnvSnapshot, cwd: &'a Path) -> Self {
        Self {
            env,
            cwd,
            home: dirs_next::home_dir(),
        }
    }

    #[must_use]
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// Layers, lowest precedence first: defaults, the user config file (or
    /// the explicit `--config`/`PYSCOPE_CONFIG` file, which replaces both file
    /// layers), `[tool.pyscope]` in `pyproject.toml`, environment, flags.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] for unreadable files and ill-typed values.
    pub fn load(
        &self,
        explicit: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Settings, ConfigError> {
        let mut settings = Settings::default();
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| self.env.var(CONFIG_ENV).filter(|v| !v.is_empty()).map(PathBuf::from));

        if let Some(path) = explicit {
            let path = if path.is_relative() {
                self.cwd.join(path)
            } else {
                path
            };
            if !path.is_file() {
                return Err(ConfigError::Missing { path });
            }
            let layer = load_file(&path)?;
            settings.apply(layer, ConfigSource::File { path });
        } else {
            if let Some(path) = self.user_config_path().filter(|path| path.is_file()) {
                let layer = load_file(&path)?;
                settings.apply(layer, ConfigSource::File { path });
            }
            let pyproject = self.cwd.join(PYPROJECT);
            if pyproject.is_file() {
                if let Some(layer) = load_pyproject(&pyproject)? {
                    settings.apply(layer, ConfigSource::Pyproject { path: pyproject });
                }
            }
        }

        settings.apply(Layer::from_env(self.env)?, ConfigSource::Environment);
        settings.apply(Layer::from_overrides(overrides)?, ConfigSource::CommandLine);
        Ok(settings)
    }

    fn user_config_path(&self) -> Option<PathBuf> {
        self.home
            .as_ref()
            .map(|home| home.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE))
    }
}

fn read_document(path: &Path) -> Result<DocumentMut, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    contents
        .parse::<DocumentMut>()
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn load_file(path: &Path) -> Result<Layer, ConfigError> {
    let doc = read_document(path)?;
    Layer::from_table(doc.as_table(), &path.display().to_string())
}

// The pyproject belongs to the user's project; a broken one is reported but
// does not stop resolution. Only our own table is validated strictly.
fn load_pyproject(path: &Path) -> Result<Option<Layer>, ConfigError> {
    let doc = match read_document(path) {
        Ok(doc) => doc,
        Err(err) => {
            warn!("skipping project configuration: {err}");
            return Ok(None);
        }
    };
    let Some(item) = doc.get("tool").and_then(|tool| tool.get("pyscope")) else {
        return Ok(None);
    };
    let origin = format!("[tool.pyscope] of {}", path.display());
    let table = item.as_table_like().ok_or_else(|| ConfigError::InvalidType {
        key: "tool.pyscope".to_string(),
        expected: "a table",
        origin: path.display().to_string(),
    })?;
    Layer::from_table(table, &origin).map(Some)
}

fn string_value(
    table: &dyn TableLike,
    key: &str,
    origin: &str,
) -> Result<Option<String>, ConfigError> {
    match table.get(key) {
        None => Ok(None),
        Some(item) => item
            .as_str()
            .map(|value| Some(value.to_string()))
            .ok_or_else(|| invalid_type(key, "a string", origin)),
    }
}

fn bool_value(table: &dyn TableLike, key: &str, origin: &str) -> Result<Option<bool>, ConfigError> {
    match table.get(key) {
        None => Ok(None),
        Some(item) => item
            .as_bool()
            .map(Some)
            .ok_or_else(|| invalid_type(key, "a boolean", origin)),
    }
}

fn invalid_type(key: &str, expected: &'static str, origin: &str) -> ConfigError {
    ConfigError::InvalidType {
        key: key.to_string(),
        expected,
        origin: origin.to_string(),
    }
}

fn non_empty(key: &str, value: String, origin: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty {
            key: key.to_string(),
            origin: origin.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_package_manager(raw: &str, origin: &str) -> Result<PackageManager, ConfigError> {
    raw.parse().map_err(|source| ConfigError::PackageManager {
        origin: origin.to_string(),
        source,
    })
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn timeout_from_secs(key: &str, secs: i64) -> Result<Duration, ConfigError> {
    u64::try_from(secs)
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidTimeout {
            key: key.to_string(),
            value: secs.to_string(),
        })
}
