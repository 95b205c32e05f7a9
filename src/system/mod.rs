//! # System Interaction Layer
//!
//! The boundary between the workspace model and the operating system: child processes,
//! environment variables and the AWS CLI.
//!
//! ## Modules
//!
//! - **`credentials`**: Resolves the AWS credentials injected into executed commands, either
//!   from the environment or by asking the AWS CLI to export a named profile.
//! - **`executor`**: The `ExecutionGateway` trait and its production implementation, which
//!   runs Terragrunt in the directory of a selected file, captures its combined output and
//!   saves it next to the file.
//! - **`dispatch`**: Runs gateway requests on a background worker and delivers the results
//!   back as events, so the interactive session stays responsive.

pub mod credentials;
pub mod dispatch;
pub mod executor;
