//! MCP Server Entry Point
//!
//! Loads configuration, initializes logging on stderr and serves the
//! Minecraft tools over the configured transport.

use anyhow::{Context, Result};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use minecraft_mcp_server::core::config::{LoggingConfig, safe_url};
use minecraft_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    init_logging(&config.logging);
    config.log_warnings();

    info!("Starting {} v{}", config.server.name, config.server.version);
    info!(
        "Minecraft API at {} over {}",
        safe_url(&config.minecraft.base_url),
        config.transport.description()
    );

    let server = McpServer::new(config.clone()).context("failed to create the Minecraft client")?;

    info!("Server initialized");

    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Always writes to stderr; stdout carries the stdio MCP channel.
fn init_logging(logging: &LoggingConfig) {
    let level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
