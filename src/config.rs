//! Layered configuration for recipebook.
//!
//! Settings are read from `.recipebook/recipebook.toml`, then environment
//! variables (a `.env` file is loaded into the environment by `main`), then
//! CLI flags. Later layers win.
//!
//! # Configuration File Format
//!
//! ```toml
//! [backend]
//! api_url = "http://localhost:5000/api"
//! auth_url = "http://localhost:5000/auth/api"
//!
//! [upload]
//! url = "http://localhost:3000/api/upload-image"
//! port = 3000
//! max_bytes = 5242880
//!
//! [autocomplete]
//! debounce_ms = 300
//! min_chars = 2
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::init::get_recipebook_dir;

pub const ENV_API_URL: &str = "RECIPEBOOK_API_URL";
pub const ENV_AUTH_URL: &str = "RECIPEBOOK_AUTH_URL";
pub const ENV_UPLOAD_URL: &str = "RECIPEBOOK_UPLOAD_URL";
pub const ENV_STATIC_DIR: &str = "RECIPEBOOK_STATIC_DIR";
pub const ENV_PORT: &str = "RECIPEBOOK_PORT";

/// Largest image the uploader and the proxy accept: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Backend endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSection {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
}

fn default_api_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_auth_url() -> String {
    "http://localhost:5000/auth/api".to_string()
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            auth_url: default_auth_url(),
        }
    }
}

/// Image upload proxy settings, shared by the server and the uploader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSection {
    /// Where the uploader posts images
    #[serde(default = "default_upload_url")]
    pub url: String,
    /// Directory the proxy serves; images land in `<static_dir>/uploads`.
    /// Defaults to `.recipebook/public`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
}

fn default_upload_url() -> String {
    "http://localhost:3000/api/upload-image".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl Default for UploadSection {
    fn default() -> Self {
        Self {
            url: default_upload_url(),
            static_dir: None,
            port: default_port(),
            max_bytes: default_max_bytes(),
        }
    }
}

/// Suggestion panel tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutocompleteSection {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_chars() -> usize {
    2
}

impl Default for AutocompleteSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_chars: default_min_chars(),
        }
    }
}

/// Contents of `recipebook.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipebookToml {
    #[serde(default)]
    pub backend: BackendSection,
    #[serde(default)]
    pub upload: UploadSection,
    #[serde(default)]
    pub autocomplete: AutocompleteSection,
}

impl RecipebookToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse recipebook.toml")
    }

    /// Load `recipebook.toml` from the given directory, or defaults when the
    /// file doesn't exist.
    pub fn load_or_default(recipebook_dir: &Path) -> Result<Self> {
        let config_path = recipebook_dir.join("recipebook.toml");
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize recipebook.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (key, url) in [
            ("backend.api_url", &self.backend.api_url),
            ("backend.auth_url", &self.backend.auth_url),
            ("upload.url", &self.upload.url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                warnings.push(format!("Invalid {} '{}': expected an http(s) URL", key, url));
            }
        }

        if self.upload.max_bytes == 0 {
            warnings.push("upload.max_bytes is 0: every image would be rejected".to_string());
        }
        if self.autocomplete.min_chars == 0 {
            warnings.push("autocomplete.min_chars is 0: empty input would query the catalog".to_string());
        }
        if self.autocomplete.debounce_ms > 5_000 {
            warnings.push(format!(
                "autocomplete.debounce_ms = {} is unusually long",
                self.autocomplete.debounce_ms
            ));
        }

        warnings
    }
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub upload_url: Option<String>,
    pub port: Option<u16>,
    pub verbose: bool,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct RecipebookConfig {
    pub project_dir: PathBuf,
    pub recipebook_dir: PathBuf,
    pub api_url: String,
    pub auth_url: String,
    pub upload_url: String,
    pub static_dir: PathBuf,
    pub port: u16,
    pub max_upload_bytes: u64,
    pub debounce: Duration,
    pub min_chars: usize,
    pub verbose: bool,
    /// The parsed file layer
    pub toml: RecipebookToml,
}

impl RecipebookConfig {
    /// Load the file layer from `project_dir` and apply environment and CLI
    /// overrides.
    pub fn load(project_dir: PathBuf, cli: CliOverrides) -> Result<Self> {
        let recipebook_dir = get_recipebook_dir(&project_dir);
        let toml = RecipebookToml::load_or_default(&recipebook_dir)?;
        Ok(Self::resolve(
            project_dir,
            toml,
            |key| std::env::var(key).ok(),
            cli,
        ))
    }

    /// Merge file → env → CLI. `env` looks a variable up by name.
    pub fn resolve(
        project_dir: PathBuf,
        toml: RecipebookToml,
        env: impl Fn(&str) -> Option<String>,
        cli: CliOverrides,
    ) -> Self {
        let recipebook_dir = get_recipebook_dir(&project_dir);

        let api_url = cli
            .api_url
            .or_else(|| env(ENV_API_URL))
            .unwrap_or_else(|| toml.backend.api_url.clone());
        let auth_url = env(ENV_AUTH_URL).unwrap_or_else(|| toml.backend.auth_url.clone());
        let upload_url = cli
            .upload_url
            .or_else(|| env(ENV_UPLOAD_URL))
            .unwrap_or_else(|| toml.upload.url.clone());
        let static_dir = env(ENV_STATIC_DIR)
            .map(PathBuf::from)
            .or_else(|| toml.upload.static_dir.clone())
            .unwrap_or_else(|| recipebook_dir.join("public"));
        let port = cli
            .port
            .or_else(|| env(ENV_PORT).and_then(|p| p.parse().ok()))
            .unwrap_or(toml.upload.port);

        Self {
            project_dir,
            recipebook_dir,
            api_url: api_url.trim_end_matches('/').to_string(),
            auth_url: auth_url.trim_end_matches('/').to_string(),
            upload_url,
            static_dir,
            port,
            max_upload_bytes: toml.upload.max_bytes,
            debounce: Duration::from_millis(toml.autocomplete.debounce_ms),
            min_chars: toml.autocomplete.min_chars,
            verbose: cli.verbose,
            toml,
        }
    }

    /// File holding the local key-value records (drafts).
    pub fn storage_file(&self) -> PathBuf {
        self.recipebook_dir.join("storage.json")
    }

    /// File holding the persisted backend session.
    pub fn session_file(&self) -> PathBuf {
        self.recipebook_dir.join("session.json")
    }

    pub fn config_file(&self) -> PathBuf {
        self.recipebook_dir.join("recipebook.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = RecipebookConfig::resolve(
            PathBuf::from("/tmp/p"),
            RecipebookToml::default(),
            no_env,
            CliOverrides::default(),
        );
        assert_eq!(config.api_url, "http://localhost:5000/api");
        assert_eq!(config.auth_url, "http://localhost:5000/auth/api");
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.min_chars, 2);
        assert_eq!(config.static_dir, PathBuf::from("/tmp/p/.recipebook/public"));
        assert_eq!(
            config.storage_file(),
            PathBuf::from("/tmp/p/.recipebook/storage.json")
        );
    }

    #[test]
    fn test_parse_partial_file_fills_defaults() {
        let toml = RecipebookToml::parse(
            r#"
[backend]
api_url = "https://recipes.example/api/"

[autocomplete]
debounce_ms = 150
"#,
        )
        .unwrap();
        assert_eq!(toml.backend.auth_url, "http://localhost:5000/auth/api");
        assert_eq!(toml.autocomplete.min_chars, 2);

        let config = RecipebookConfig::resolve(
            PathBuf::from("/p"),
            toml,
            no_env,
            CliOverrides::default(),
        );
        assert_eq!(config.api_url, "https://recipes.example/api");
        assert_eq!(config.debounce, Duration::from_millis(150));
    }

    #[test]
    fn test_layer_priority_cli_over_env_over_file() {
        let toml = RecipebookToml::parse(
            r#"
[backend]
api_url = "http://file/api"

[upload]
port = 4000
"#,
        )
        .unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "http://env/api"),
            (ENV_PORT, "4100"),
            (ENV_STATIC_DIR, "/srv/static"),
        ]);
        let lookup = |k: &str| env.get(k).map(|v| v.to_string());

        let from_env = RecipebookConfig::resolve(
            PathBuf::from("/p"),
            toml.clone(),
            lookup,
            CliOverrides::default(),
        );
        assert_eq!(from_env.api_url, "http://env/api");
        assert_eq!(from_env.port, 4100);
        assert_eq!(from_env.static_dir, PathBuf::from("/srv/static"));

        let from_cli = RecipebookConfig::resolve(
            PathBuf::from("/p"),
            toml,
            lookup,
            CliOverrides {
                api_url: Some("http://cli/api".into()),
                port: Some(4200),
                ..CliOverrides::default()
            },
        );
        assert_eq!(from_cli.api_url, "http://cli/api");
        assert_eq!(from_cli.port, 4200);
    }

    #[test]
    fn test_unparseable_env_port_falls_back_to_file() {
        let lookup = |k: &str| (k == ENV_PORT).then(|| "not-a-port".to_string());
        let config = RecipebookConfig::resolve(
            PathBuf::from("/p"),
            RecipebookToml::default(),
            lookup,
            CliOverrides::default(),
        );
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recipebook.toml");
        let mut toml = RecipebookToml::default();
        toml.upload.port = 8088;
        toml.save(&path).unwrap();

        let loaded = RecipebookToml::load(&path).unwrap();
        assert_eq!(loaded.upload.port, 8088);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempdir().unwrap();
        let toml = RecipebookToml::load_or_default(dir.path()).unwrap();
        assert_eq!(toml.upload.port, 3000);
    }

    #[test]
    fn test_validate_flags_bad_values() {
        let mut toml = RecipebookToml::default();
        assert!(toml.validate().is_empty());

        toml.backend.api_url = "localhost:5000".into();
        toml.upload.max_bytes = 0;
        toml.autocomplete.min_chars = 0;
        let warnings = toml.validate();
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("backend.api_url"));
    }

    #[test]
    fn test_parse_invalid_toml_errors() {
        let err = RecipebookToml::parse("[backend\napi_url=").unwrap_err();
        assert!(err.to_string().contains("Failed to parse recipebook.toml"));
    }
}
