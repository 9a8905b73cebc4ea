use anyhow::Result;
use clap::Parser;
use couplet_generator::ai::DeepSeekCoupletClient;
use couplet_generator::config::{Config, API_KEY_VAR};
use couplet_generator::server::{get_app, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "couplet-generator")]
#[command(about = "Serve the couplet page and the /api/generate endpoint")]
struct CliArgs {
    /// Address to bind (overrides HOST).
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT).
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding index.html and other assets (overrides STATIC_ROOT).
    #[arg(long, value_name = "DIR")]
    static_root: Option<PathBuf>,
}

impl CliArgs {
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(static_root) = self.static_root {
            config.static_root = static_root;
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "couplet_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting couplet-generator");

    let args = CliArgs::parse();
    let mut config = Config::from_env()?;
    args.apply(&mut config);

    if config.has_api_key() {
        info!("{} is configured", API_KEY_VAR);
    } else {
        warn!(
            "{} is not set; /api/generate will fail until it is",
            API_KEY_VAR
        );
    }
    info!("Serving static files from {}", config.static_root.display());

    let couplets = DeepSeekCoupletClient::from_config(&config, reqwest::Client::new());
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState {
        config,
        couplets: Arc::new(couplets),
    });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, get_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
