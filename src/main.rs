use anyhow::{Context, Result};
use caption_proxy::models::Config;
use caption_proxy::server;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "caption-proxy")]
#[command(about = "Serve AI-generated photo captions without exposing the API key")]
struct CliArgs {
    /// Address to bind the HTTP server to (host:port).
    #[arg(long, env = "CAPTION_PROXY_BIND", default_value = "0.0.0.0:8888")]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caption_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting caption-proxy");

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!("Caption route: {}", config.caption_route);

    let listener = TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;

    server::serve(listener, server::router_from_config(&config)).await?;
    Ok(())
}
