//! Session commands: `recipebook login|register|logout|whoami`.

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Password};
use std::path::Path;

use recipebook::api::{Credentials, Registration};
use recipebook::errors::SessionError;
use recipebook::session::Session;
use recipebook::ui::{Notice, with_spinner};

use super::super::Cli;
use super::{backend, load_config};

pub async fn cmd_login(project_dir: &Path, cli: &Cli, email: Option<String>) -> Result<()> {
    let config = load_config(project_dir, cli)?;

    let email = match email {
        Some(e) => e,
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .context("Failed to read email")?,
    };
    let password = Password::new()
        .with_prompt("Password")
        .interact()
        .context("Failed to read password")?;

    let credentials = Credentials { email, password };
    let client = backend(&config)?;
    let session = with_spinner(
        "Logging in...",
        Session::login(client, &credentials, &config.session_file()),
    )
    .await;

    match session {
        Ok(session) => {
            Notice::success(format!("Welcome back, {}!", session.user().display_name())).print();
            Ok(())
        }
        Err(SessionError::Api(e)) => {
            Notice::error(format!("Login failed: {}", e.user_message())).print();
            Err(e).context("Login failed")
        }
        Err(e) => Err(e).context("Failed to store session"),
    }
}

pub async fn cmd_register(project_dir: &Path, cli: &Cli) -> Result<()> {
    let config = load_config(project_dir, cli)?;

    let first_name: String = Input::new()
        .with_prompt("First name")
        .interact_text()
        .context("Failed to read first name")?;
    let last_name: String = Input::new()
        .with_prompt("Last name")
        .interact_text()
        .context("Failed to read last name")?;
    let email: String = Input::new()
        .with_prompt("Email")
        .interact_text()
        .context("Failed to read email")?;
    let phone: String = Input::new()
        .with_prompt("Phone (optional)")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read phone")?;
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .context("Failed to read password")?;

    let registration = Registration {
        email,
        password,
        first_name,
        last_name,
        phone: (!phone.trim().is_empty()).then(|| phone.trim().to_string()),
    };
    let client = backend(&config)?;
    let session = with_spinner(
        "Creating account...",
        Session::register(client, &registration, &config.session_file()),
    )
    .await
    .context("Registration failed")?;

    Notice::success(format!(
        "Account created. Welcome, {}!",
        session.user().display_name()
    ))
    .print();
    Ok(())
}

pub async fn cmd_logout(project_dir: &Path, cli: &Cli) -> Result<()> {
    let config = load_config(project_dir, cli)?;
    let client = backend(&config)?;

    let session = match Session::load(client, &config.session_file()).await {
        Ok(Some(session)) => session,
        Ok(None) | Err(SessionError::Expired) => {
            println!("Not logged in.");
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to restore session"),
    };

    if let Err(e) = session.logout().await {
        tracing::warn!(error = %e, "Backend logout failed; local session removed");
    }
    Notice::success("Logged out").print();
    Ok(())
}

pub async fn cmd_whoami(project_dir: &Path, cli: &Cli) -> Result<()> {
    let config = load_config(project_dir, cli)?;
    let session = super::require_session(&config).await?;
    let user = session.user();

    println!("{}", style(user.display_name()).bold());
    println!("  email: {}", user.email);
    if let Some(role) = &user.role {
        println!("  role:  {}", role);
    }
    println!("  api:   {}", session.client().api_url());
    Ok(())
}
