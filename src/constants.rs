// src/constants.rs

/// The folder name that marks the start of the `<project>/<region>/<stack>` convention.
pub const ANCHOR_SEGMENT: &str = "workspaces";

/// Number of path segments that must follow the anchor (project, region, stack).
pub const COORDINATE_DEPTH: usize = 3;

/// File name suffix of the definition files picked up by the scanner.
pub const RECOGNIZED_SUFFIX: &str = "terragrunt.hcl";

/// Sentinel accepted by every filter selector meaning "do not filter on this level".
pub const ALL_SELECTOR: &str = "All";

/// Default command run against a selected file's directory.
pub const DEFAULT_COMMAND: &str = "terragrunt init -reconfigure";

/// Name of the file, next to the selected definition, that receives the captured output.
pub const OUTPUT_FILENAME: &str = "output";

/// Shown for a file that has not been executed during the current session.
pub const NO_EXECUTION_PLACEHOLDER: &str = "# No execution yet";

/// AWS profile used when neither the config nor `AWS_PROFILE` names one.
pub const DEFAULT_AWS_PROFILE: &str = "default";

/// AWS region used when neither the config nor `AWS_REGION` names one.
pub const DEFAULT_AWS_REGION: &str = "us-east-2";

/// Name of the application directory under the system config dir (`~/.config/tgr`).
pub const APP_CONFIG_DIR: &str = "tgr";

/// Name of the configuration file inside [`APP_CONFIG_DIR`].
pub const CONFIG_FILENAME: &str = "config.toml";

/// Environment variable that overrides the configuration file location.
pub const CONFIG_ENV_VAR: &str = "TGR_CONFIG";
