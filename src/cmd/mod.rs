//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module    | Commands handled                                 |
//! |-----------|--------------------------------------------------|
//! | `init`    | `Init`                                           |
//! | `config`  | `Config`                                         |
//! | `auth`    | `Login`, `Register`, `Logout`, `Whoami`          |
//! | `recipe`  | `Recipe`                                         |
//! | `drafts`  | `Drafts`                                         |
//! | `family`  | `Family`                                         |
//! | `serve`   | `Serve`                                          |
//!
//! The interactive wizard loop shared by `recipe new|edit` and
//! `drafts resume` lives in `wizard`.

pub mod auth;
pub mod config;
pub mod drafts;
pub mod family;
pub mod init;
pub mod recipe;
pub mod serve;
pub mod wizard;

pub use auth::{cmd_login, cmd_logout, cmd_register, cmd_whoami};
pub use config::cmd_config;
pub use drafts::cmd_drafts;
pub use family::cmd_family;
pub use init::cmd_init;
pub use recipe::cmd_recipe;
pub use serve::cmd_serve;

use anyhow::{Context, Result};
use std::path::Path;

use recipebook::api::BackendClient;
use recipebook::config::{CliOverrides, RecipebookConfig};
use recipebook::errors::SessionError;
use recipebook::session::Session;

use super::Cli;

pub(crate) fn load_config(project_dir: &Path, cli: &Cli) -> Result<RecipebookConfig> {
    RecipebookConfig::load(
        project_dir.to_path_buf(),
        CliOverrides {
            api_url: cli.api_url.clone(),
            upload_url: cli.upload_url.clone(),
            port: None,
            verbose: cli.verbose,
        },
    )
}

pub(crate) fn backend(config: &RecipebookConfig) -> Result<BackendClient> {
    BackendClient::new(&config.api_url, &config.auth_url).context("Failed to create HTTP client")
}

/// Restore the stored session or explain how to get one.
pub(crate) async fn require_session(config: &RecipebookConfig) -> Result<Session> {
    let client = backend(config)?;
    match Session::require(client, &config.session_file()).await {
        Ok(session) => Ok(session),
        Err(SessionError::Api(recipebook::errors::ApiError::Unauthorized)) => {
            anyhow::bail!("Not logged in. Run 'recipebook login' first.")
        }
        Err(SessionError::Expired) => {
            anyhow::bail!("Session expired. Run 'recipebook login' again.")
        }
        Err(e) => Err(e).context("Failed to restore session"),
    }
}
