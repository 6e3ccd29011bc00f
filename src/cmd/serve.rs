//! Image upload proxy: `recipebook serve`.

use anyhow::Result;
use std::path::Path;

use recipebook::upload::{ServerConfig, start_server};

use super::super::Cli;
use super::load_config;

pub async fn cmd_serve(project_dir: &Path, cli: &Cli, port: Option<u16>, dev: bool) -> Result<()> {
    let config = load_config(project_dir, cli)?;
    let mut server = ServerConfig::from_config(&config, dev);
    if let Some(port) = port {
        server.port = port;
    }

    println!("Serving uploads from {}", server.uploads_dir().display());
    if dev {
        println!("Dev mode: CORS is permissive");
    }
    start_server(server).await
}
