// src/system/executor.rs

use crate::{
    core::config::ExecConfig,
    system::credentials::{self, CredentialError, CredentialSource, EnvLookup},
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use thiserror::Error;
use uuid::Uuid;

/// Why one execution did not produce a report.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The command line has unbalanced quotes.
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    /// The command line is blank.
    #[error("No command specified to run.")]
    EmptyCommand,
    /// The file's directory vanished after indexing.
    #[error("Working directory '{0}' does not exist.")]
    MissingWorkingDir(String),
    /// Credential resolution failed before launch.
    #[error("Could not obtain credentials: {0}")]
    Credentials(#[from] CredentialError),
    /// The program could not be spawned.
    #[error("Command '{command}' could not be executed: {source}")]
    Launch {
        /// The rendered command line.
        command: String,
        /// The spawn failure.
        #[source]
        source: std::io::Error,
    },
    /// The program ran and failed.
    #[error("Command '{command}' exited with {status}.")]
    NonZeroExit {
        /// The rendered command line.
        command: String,
        /// Exit code or signal.
        status: String,
        /// Combined output up to the failure.
        output: String,
    },
    /// The program succeeded but its output file could not be written.
    #[error("Command output could not be saved to '{path}': {source}")]
    PersistOutput {
        /// The output file path.
        path: String,
        /// The output that was not saved.
        output: String,
        /// The write failure.
        #[source]
        source: std::io::Error,
    },
}

impl ExecutionError {
    /// The output the command produced before failing, if it ran at all.
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            Self::NonZeroExit { output, .. } | Self::PersistOutput { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// A request to run the configured command against one definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    /// Correlates the request with the event that reports its result.
    pub id: Uuid,
    /// The selected definition file.
    pub file_path: PathBuf,
}

impl ExecutionRequest {
    /// Creates a request with a fresh id.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_path: file_path.into(),
        }
    }

    /// The command runs in the directory that holds the file.
    pub fn working_dir(&self) -> &Path {
        self.file_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// What a successful execution produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Id of the originating request.
    pub id: Uuid,
    /// The rendered command line.
    pub command: String,
    /// Where the command ran.
    pub working_dir: PathBuf,
    /// Standard output followed by standard error.
    pub output: String,
    /// The file the output was saved to.
    pub output_file: PathBuf,
}

/// Runs the provisioning tool for a selected file. Implementations must be callable from
/// a worker thread; each call is independent and nothing is cached.
pub trait ExecutionGateway: Send + Sync {
    /// Runs the command for `request` and returns its combined output.
    fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionReport, ExecutionError>;
}

/// The production gateway: spawns the configured command (Terragrunt by default) in the
/// file's directory, with optional AWS credentials injected into its environment.
#[derive(Debug, Clone)]
pub struct TerragruntGateway {
    command_line: String,
    output_file: String,
    credentials: CredentialSource,
    env_lookup: EnvLookup,
}

impl TerragruntGateway {
    /// Creates a gateway with an explicit command line and credential source.
    pub fn new(
        command_line: impl Into<String>,
        output_file: impl Into<String>,
        credentials: CredentialSource,
    ) -> Self {
        Self {
            command_line: command_line.into(),
            output_file: output_file.into(),
            credentials,
            env_lookup: credentials::system_env,
        }
    }

    /// Creates a gateway from the `[exec]` section of the config.
    pub fn from_config(config: &ExecConfig) -> Self {
        Self::new(
            config.command.clone(),
            config.output_file.clone(),
            CredentialSource::from_config(config, credentials::system_env),
        )
    }

    /// Replaces the environment lookup used to resolve credentials.
    pub fn with_env_lookup(mut self, lookup: EnvLookup) -> Self {
        self.env_lookup = lookup;
        self
    }

    /// The command line this gateway runs.
    pub fn command_line(&self) -> &str {
        &self.command_line
    }
}

impl ExecutionGateway for TerragruntGateway {
    fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionReport, ExecutionError> {
        let command_line = self.command_line.trim();
        let parts = shlex::split(command_line)
            .ok_or_else(|| ExecutionError::CommandParse(command_line.to_string()))?;
        let (program, args) = parts.split_first().ok_or(ExecutionError::EmptyCommand)?;

        let working_dir = request.working_dir();
        if !working_dir.is_dir() {
            return Err(ExecutionError::MissingWorkingDir(
                working_dir.display().to_string(),
            ));
        }
        let clean_cwd = dunce::simplified(working_dir);

        let env_vars: HashMap<String, String> = self
            .credentials
            .resolve(self.env_lookup)?
            .map(|c| c.env_vars())
            .unwrap_or_default();

        log::debug!(
            "Executing '{}' in '{}' ({} credential variable(s) injected)",
            command_line,
            clean_cwd.display(),
            env_vars.len()
        );

        let command_output = StdCommand::new(program)
            .args(args)
            .current_dir(clean_cwd)
            .envs(&env_vars)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ExecutionError::Launch {
                command: command_line.to_string(),
                source: e,
            })?;

        let output = combine_output(&command_output.stdout, &command_output.stderr);

        // The output is saved whether or not the command succeeded.
        let output_file = clean_cwd.join(&self.output_file);
        if let Err(e) = fs::write(&output_file, &output) {
            return Err(ExecutionError::PersistOutput {
                path: output_file.display().to_string(),
                output,
                source: e,
            });
        }

        if !command_output.status.success() {
            return Err(ExecutionError::NonZeroExit {
                command: command_line.to_string(),
                status: describe_status(command_output.status),
                output,
            });
        }

        Ok(ExecutionReport {
            id: request.id,
            command: command_line.to_string(),
            working_dir: clean_cwd.to_path_buf(),
            output,
            output_file,
        })
    }
}

fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    if !stderr.is_empty() {
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&String::from_utf8_lossy(stderr));
    }
    combined
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}
