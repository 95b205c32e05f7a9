// src/core/config.rs

use crate::constants::{
    ANCHOR_SEGMENT, APP_CONFIG_DIR, CONFIG_ENV_VAR, CONFIG_FILENAME, DEFAULT_COMMAND,
    OUTPUT_FILENAME, RECOGNIZED_SUFFIX,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};
use thiserror::Error;

/// Errors from locating, reading or validating the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Could not read config file '{path}': {source}")]
    Io {
        /// The config file path.
        path: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`RunnerConfig`].
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        /// The config file path.
        path: String,
        /// The TOML error, with line and column.
        #[source]
        source: toml::de::Error,
    },
    /// An explicitly requested file does not exist.
    #[error("Config file '{path}' does not exist.")]
    NotFound {
        /// The requested path.
        path: String,
    },
    /// `~` or an environment variable in a path could not be expanded.
    #[error("Failed to expand path '{template}': {message}")]
    Expand {
        /// The path before expansion.
        template: String,
        /// What went wrong.
        message: String,
    },
    /// The values parsed but break a rule.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// `[scan]` section: how the tree is walked and classified.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ScanConfig {
    /// Folder name that marks the start of `<project>/<region>/<stack>`.
    pub anchor: String,
    /// File name suffix of the definitions to index.
    pub suffix: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            anchor: ANCHOR_SEGMENT.to_string(),
            suffix: RECOGNIZED_SUFFIX.to_string(),
        }
    }
}

/// Where the execution gateway gets AWS credentials from.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CredentialMode {
    /// Inject nothing; the child process inherits whatever the environment has.
    None,
    /// Read `AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY`/`AWS_SESSION_TOKEN` from the environment.
    Environment,
    /// Resolve a named profile through the AWS CLI.
    #[default]
    Profile,
}

/// `[exec]` section: what runs when a file is executed.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ExecConfig {
    /// Full command line, split with shell rules.
    pub command: String,
    /// Name of the output file written next to the selected definition.
    pub output_file: String,
    /// Credential injection mode.
    pub credentials: CredentialMode,
    /// AWS profile; falls back to `AWS_PROFILE`, then `default`.
    pub profile: Option<String>,
    /// AWS region; falls back to `AWS_REGION`, then `us-east-2`.
    pub region: Option<String>,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            output_file: OUTPUT_FILENAME.to_string(),
            credentials: CredentialMode::default(),
            profile: None,
            region: None,
        }
    }
}

/// The deserialized `config.toml`. Every field is optional in the file.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RunnerConfig {
    /// The `[scan]` section.
    pub scan: ScanConfig,
    /// The `[exec]` section.
    pub exec: ExecConfig,
}

impl RunnerConfig {
    /// Parses and validates the TOML content of a config file.
    pub fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.anchor.trim().is_empty() {
            return Err(ConfigError::Invalid("scan.anchor must not be empty".to_string()));
        }
        if self.scan.anchor.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "scan.anchor must be a single folder name, got '{}'",
                self.scan.anchor
            )));
        }
        if self.scan.suffix.is_empty() {
            return Err(ConfigError::Invalid("scan.suffix must not be empty".to_string()));
        }
        if self.exec.command.trim().is_empty() {
            return Err(ConfigError::Invalid("exec.command must not be empty".to_string()));
        }
        if self.exec.output_file.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "exec.output_file must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads the configuration, following the lookup order `--config` > `$TGR_CONFIG` >
/// `<config dir>/tgr/config.toml`. No file at all means defaults.
pub fn load(explicit: Option<&str>) -> Result<RunnerConfig, ConfigError> {
    let env_value = env::var(CONFIG_ENV_VAR).ok();
    match locate_config(explicit, env_value.as_deref(), dirs::config_dir())? {
        Some(path) => {
            log::debug!("Loading config from '{}'", path.display());
            load_from_path(&path)
        }
        None => {
            log::debug!("No config file found, using defaults.");
            Ok(RunnerConfig::default())
        }
    }
}

/// Reads and parses one config file.
pub fn load_from_path(path: &Path) -> Result<RunnerConfig, ConfigError> {
    let origin = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: origin.clone(),
        source,
    })?;
    RunnerConfig::parse(&content, &origin)
}

/// Picks the config file to load. An explicit or env-provided path must exist; the
/// default location is optional.
fn locate_config(
    explicit: Option<&str>,
    env_value: Option<&str>,
    system_config_dir: Option<PathBuf>,
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(template) = explicit.or(env_value).filter(|s| !s.trim().is_empty()) {
        let path = expand_path(template)?;
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }
        return Ok(Some(path));
    }

    Ok(system_config_dir
        .map(|dir| dir.join(APP_CONFIG_DIR).join(CONFIG_FILENAME))
        .filter(|path| path.is_file()))
}

/// Expands `~` and environment variables in a user-supplied path.
pub fn expand_path(template: &str) -> Result<PathBuf, ConfigError> {
    let expanded = shellexpand::full(template).map_err(|e| ConfigError::Expand {
        template: template.to_string(),
        message: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}
