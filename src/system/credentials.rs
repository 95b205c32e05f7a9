// src/system/credentials.rs

use crate::{
    constants::{DEFAULT_AWS_PROFILE, DEFAULT_AWS_REGION},
    core::config::{CredentialMode, ExecConfig},
};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

/// Environment variable holding the access key id.
pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the secret access key.
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
/// Environment variable holding the optional session token.
pub const SESSION_TOKEN_VAR: &str = "AWS_SESSION_TOKEN";

/// Reads an environment variable. Injected so resolution can be tested without touching
/// the process environment.
pub type EnvLookup = fn(&str) -> Option<String>;

/// The default [`EnvLookup`]: the real process environment.
pub fn system_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Errors from resolving credentials.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// A required variable is unset or empty.
    #[error("Environment variable '{0}' is not set.")]
    MissingVariable(&'static str),
    /// `aws` could not be started.
    #[error("Could not launch the AWS CLI: {0}")]
    AwsCliLaunch(#[source] io::Error),
    /// `aws configure export-credentials` exited with a failure.
    #[error("AWS CLI could not export credentials for profile '{profile}': {stderr}")]
    AwsCliFailed {
        /// The profile that was asked for.
        profile: String,
        /// What the AWS CLI printed on stderr.
        stderr: String,
    },
    /// The exported JSON does not have the expected shape.
    #[error("Unexpected output from the AWS CLI: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A resolved set of AWS credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key. Never printed.
    pub secret_access_key: String,
    /// Session token of temporary credentials.
    pub session_token: Option<String>,
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl AwsCredentials {
    /// The environment entries injected into the child process.
    pub fn env_vars(&self) -> HashMap<String, String> {
        let mut vars = HashMap::from([
            (ACCESS_KEY_ID_VAR.to_string(), self.access_key_id.clone()),
            (SECRET_ACCESS_KEY_VAR.to_string(), self.secret_access_key.clone()),
        ]);
        if let Some(token) = &self.session_token {
            vars.insert(SESSION_TOKEN_VAR.to_string(), token.clone());
        }
        vars
    }
}

/// Where credentials come from when a command is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Inject nothing.
    None,
    /// Forward the three `AWS_*` variables, failing if the key pair is missing.
    Environment,
    /// Ask the AWS CLI to export the credentials of a named profile.
    Profile {
        /// The AWS CLI profile name.
        profile: String,
        /// Region exported as `AWS_REGION`.
        region: String,
    },
}

impl CredentialSource {
    /// Builds the source from the `[exec]` config, falling back to `AWS_PROFILE` and
    /// `AWS_REGION`, then to the built-in defaults.
    pub fn from_config(config: &ExecConfig, lookup: EnvLookup) -> Self {
        match config.credentials {
            CredentialMode::None => Self::None,
            CredentialMode::Environment => Self::Environment,
            CredentialMode::Profile => Self::Profile {
                profile: config
                    .profile
                    .clone()
                    .or_else(|| lookup("AWS_PROFILE"))
                    .unwrap_or_else(|| DEFAULT_AWS_PROFILE.to_string()),
                region: config
                    .region
                    .clone()
                    .or_else(|| lookup("AWS_REGION"))
                    .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string()),
            },
        }
    }

    /// Resolves the credentials, or `None` when nothing should be injected.
    pub fn resolve(&self, lookup: EnvLookup) -> Result<Option<AwsCredentials>, CredentialError> {
        match self {
            Self::None => Ok(None),
            Self::Environment => Ok(Some(AwsCredentials {
                access_key_id: lookup(ACCESS_KEY_ID_VAR)
                    .ok_or(CredentialError::MissingVariable(ACCESS_KEY_ID_VAR))?,
                secret_access_key: lookup(SECRET_ACCESS_KEY_VAR)
                    .ok_or(CredentialError::MissingVariable(SECRET_ACCESS_KEY_VAR))?,
                session_token: lookup(SESSION_TOKEN_VAR),
            })),
            Self::Profile { profile, region } => export_profile_credentials(profile, region).map(Some),
        }
    }
}

/// The `--format process` document printed by `aws configure export-credentials`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct ProcessCredentials {
    access_key_id: String,
    secret_access_key: String,
    #[serde(default)]
    session_token: Option<String>,
}

fn parse_process_credentials(json: &str) -> Result<AwsCredentials, CredentialError> {
    let parsed: ProcessCredentials = serde_json::from_str(json)?;
    Ok(AwsCredentials {
        access_key_id: parsed.access_key_id,
        secret_access_key: parsed.secret_access_key,
        session_token: parsed.session_token.filter(|t| !t.is_empty()),
    })
}

fn export_profile_credentials(profile: &str, region: &str) -> Result<AwsCredentials, CredentialError> {
    log::debug!("Exporting AWS credentials for profile '{}' ({})", profile, region);
    let output = StdCommand::new("aws")
        .args(["configure", "export-credentials", "--profile", profile, "--format", "process"])
        .env("AWS_REGION", region)
        .stdin(Stdio::null())
        .output()
        .map_err(CredentialError::AwsCliLaunch)?;

    if !output.status.success() {
        return Err(CredentialError::AwsCliFailed {
            profile: profile.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    parse_process_credentials(&String::from_utf8_lossy(&output.stdout))
}
