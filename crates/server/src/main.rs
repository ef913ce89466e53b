pub mod server;
pub mod web;

use crate::server::config::ServerConfig;
use crate::server::persistence::persist_batch;
use crate::web::{create_axum_router, AppState};

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use svcprobe_common::Environment;
use svcprobe_core::{
    load_catalog, resolve_catalog, EnvSnapshot, HttpTransport, ServiceMonitor, Transport,
};
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Run one health check batch and print the result as JSON
    Check {
        /// Target environment; defaults to the configured one
        #[arg(short, long)]
        environment: Option<Environment>,
        /// Check a single service by id
        #[arg(long)]
        id: Option<String>,
        /// Also write the JSON result to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(log_dir: &str) {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily(log_dir, "svcprobe.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    // Console output goes to stderr so `check` can print JSON on stdout.
    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let server_config = match ServerConfig::load(args.config.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to load server configuration: {e}");
            return Err(e.into());
        }
    };

    init_logging(&server_config.log_dir);
    info!(version = env!("CARGO_PKG_VERSION"), "Starting svcprobe.");

    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::new(server_config.request_timeout_ms)?);

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(server_config, transport).await,
        Command::Check {
            environment,
            id,
            output,
        } => {
            let environment = environment.unwrap_or(server_config.default_environment);
            run_check_command(&server_config, transport, environment, id.as_deref(), output).await
        }
    }
}

async fn serve(
    config: Arc<ServerConfig>,
    transport: Arc<dyn Transport>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listen_address = config.listen_address.clone();
    let app_state = Arc::new(AppState::new(config, transport));
    let app = create_axum_router(app_state);

    let listener = tokio::net::TcpListener::bind(&listen_address).await?;
    info!(address = %listen_address, "HTTP API listening.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal.");
    }
    info!("Shutdown signal received.");
}

async fn run_check_command(
    config: &ServerConfig,
    transport: Arc<dyn Transport>,
    environment: Environment,
    id: Option<&str>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env = EnvSnapshot::from_process();
    let catalog = load_catalog(config.catalog_path.as_deref().map(Path::new), &env)?;
    let services = resolve_catalog(&catalog, environment, &env);
    let monitor = ServiceMonitor::new(transport);

    let json = match id {
        Some(id) => {
            let result = monitor.check_one(&services, id, environment).await?;
            serde_json::to_string_pretty(&result)?
        }
        None => {
            let batch = monitor.run_batch(&services, environment, &HashMap::new()).await;
            persist_batch(config, &batch).await;
            serde_json::to_string_pretty(&batch)?
        }
    };

    println!("{json}");
    if let Some(path) = output {
        tokio::fs::write(&path, &json).await?;
        info!(path = ?path, "Wrote health check output.");
    }
    Ok(())
}
