//! Development server command.

use std::path::Path;

use anyhow::Result;
use vellum_server::{DevServer, DevServerConfig};

use crate::config::ConfigFile;

/// Run the dev server.
pub async fn run(config_path: &Path, port: u16, open: bool) -> Result<()> {
    tracing::info!("Starting development server on port {}", port);

    let file_config = ConfigFile::load(config_path)?;

    let config = DevServerConfig {
        site: file_config.site_config(),
        config_path: Some(config_path.to_path_buf()),
        port,
        open,
        ..Default::default()
    };

    DevServer::new(config).start().await?;

    Ok(())
}
