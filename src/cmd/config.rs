//! Configuration view and validation commands: `recipebook config`.

use anyhow::Result;

use super::super::{Cli, ConfigCommands};

pub fn cmd_config(
    project_dir: &std::path::Path,
    cli: &Cli,
    command: Option<ConfigCommands>,
) -> Result<()> {
    use recipebook::config::RecipebookToml;
    use recipebook::init::get_recipebook_dir;

    let recipebook_dir = get_recipebook_dir(project_dir);
    let config_path = recipebook_dir.join("recipebook.toml");

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Recipebook Configuration");
            println!("========================");
            println!();

            let toml = if config_path.exists() {
                println!("Config file: {}", config_path.display());
                RecipebookToml::load(&config_path)?
            } else {
                println!("No recipebook.toml found at {}", config_path.display());
                println!("Using default configuration.");
                RecipebookToml::default()
            };
            println!();

            println!("[backend]");
            println!("  api_url = \"{}\"", toml.backend.api_url);
            println!("  auth_url = \"{}\"", toml.backend.auth_url);
            println!();

            println!("[upload]");
            println!("  url = \"{}\"", toml.upload.url);
            if let Some(dir) = &toml.upload.static_dir {
                println!("  static_dir = \"{}\"", dir.display());
            }
            println!("  port = {}", toml.upload.port);
            println!("  max_bytes = {}", toml.upload.max_bytes);
            println!();

            println!("[autocomplete]");
            println!("  debounce_ms = {}", toml.autocomplete.debounce_ms);
            println!("  min_chars = {}", toml.autocomplete.min_chars);
            println!();

            println!("Effective values (with env/CLI overrides):");
            let config = super::load_config(project_dir, cli)?;
            println!("  api_url = \"{}\"", config.api_url);
            println!("  auth_url = \"{}\"", config.auth_url);
            println!("  upload_url = \"{}\"", config.upload_url);
            println!("  static_dir = \"{}\"", config.static_dir.display());
            println!("  port = {}", config.port);
            println!();

            if !config_path.exists() {
                println!("Run 'recipebook config init' to create a recipebook.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No recipebook.toml found. Using defaults (valid).");
                return Ok(());
            }

            let toml = RecipebookToml::load(&config_path)?;
            let warnings = toml.validate();

            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!(
                    "recipebook.toml already exists at {}",
                    config_path.display()
                );
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            if !recipebook_dir.exists() {
                std::fs::create_dir_all(&recipebook_dir)?;
            }

            let toml = RecipebookToml::default();
            toml.save(&config_path)?;

            println!("Created recipebook.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [backend] api_url, auth_url");
            println!("  - [upload] url, static_dir, port, max_bytes");
            println!("  - [autocomplete] debounce_ms, min_chars");
            println!();
        }
    }

    Ok(())
}
