//! Tumor Monitoring Server - Main Entry Point
//!
//! Usage: `tumor-monitor [CONFIG_FILE]`. Without an argument the path is taken
//! from `TUMOR_MONITOR_CONFIG`, and defaults apply when neither is set.

use api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TUMOR_MONITOR_CONFIG").ok());
    let config = AppConfig::load(config_path.as_deref())?;

    init_logging(&config.logging)?;

    info!("=== Tumor Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &config_path {
        info!("Loaded configuration from {}", path);
    }

    run_server(config).await
}
