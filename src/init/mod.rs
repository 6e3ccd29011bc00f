//! Initialization of the recipebook workspace directory.
//!
//! `recipebook init` creates the `.recipebook/` directory next to where the
//! client runs:
//!
//! ```text
//! .recipebook/
//! ├── recipebook.toml   # Layered configuration (file layer)
//! ├── storage.json      # Local key-value record store (drafts live here)
//! ├── session.json      # Backend session cookie (written by `login`)
//! └── public/
//!     └── uploads/      # Images stored by the upload proxy
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::RecipebookToml;

/// The name of the recipebook directory.
pub const RECIPEBOOK_DIR: &str = ".recipebook";

/// Result of initializing a recipebook directory.
#[derive(Debug)]
pub struct InitResult {
    /// Path to the `.recipebook` directory
    pub recipebook_dir: PathBuf,
    /// Whether the directory was newly created (false if it already existed)
    pub created: bool,
}

/// Create (or complete) the `.recipebook/` structure under `project_dir`.
pub fn init_project(project_dir: &Path) -> Result<InitResult> {
    let recipebook_dir = get_recipebook_dir(project_dir);

    let created = !recipebook_dir.exists();
    if created {
        std::fs::create_dir_all(&recipebook_dir).with_context(|| {
            format!("Failed to create directory: {}", recipebook_dir.display())
        })?;
    }
    ensure_directory_structure(&recipebook_dir)?;

    Ok(InitResult {
        recipebook_dir,
        created,
    })
}

/// Ensure all required subdirectories and files exist. Existing files are
/// left untouched.
fn ensure_directory_structure(recipebook_dir: &Path) -> Result<()> {
    let uploads_dir = recipebook_dir.join("public").join("uploads");
    std::fs::create_dir_all(&uploads_dir).with_context(|| {
        format!(
            "Failed to create uploads directory: {}",
            uploads_dir.display()
        )
    })?;

    let storage_file = recipebook_dir.join("storage.json");
    if !storage_file.exists() {
        std::fs::write(&storage_file, "{}").with_context(|| {
            format!("Failed to create storage.json: {}", storage_file.display())
        })?;
    }

    let config_file = recipebook_dir.join("recipebook.toml");
    if !config_file.exists() {
        RecipebookToml::default().save(&config_file)?;
    }

    Ok(())
}

/// Check if the directory has been initialized.
pub fn is_initialized(project_dir: &Path) -> bool {
    get_recipebook_dir(project_dir).exists()
}

/// Get the path to the `.recipebook` directory for a project.
pub fn get_recipebook_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(RECIPEBOOK_DIR)
}
