//! # Mint U Server binary
//!
//! Loads configuration from the environment (and `.env`), then serves the
//! mini app until Ctrl-C.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use mintu_core::{
    chain::JsonRpcChainReader,
    config::{ConfigLoad, ConfigLoader},
};
use mintu_server::{
    AppState, create_app,
    infra::startup::{REAP_INTERVAL, spawn_session_reaper},
    sessions::SessionLimits,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "mintu-server")]
#[command(about = "Farcaster mini app for minting an NFT drop on Base")]
struct Cli {
    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(clap::Args, Debug, Clone)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind
    #[arg(short, long, env = "SERVER_PORT", default_value_t = 3000)]
    port: u16,

    /// Close sessions not seen for this long (e.g. 10m, 90s)
    #[arg(long, env = "SESSION_IDLE_TIMEOUT", default_value = "10m")]
    session_idle_timeout: humantime::Duration,

    /// Refuse new sessions once this many are open
    #[arg(long, env = "MAX_SESSIONS", default_value_t = 1000)]
    max_sessions: usize,

    /// Directory served at /static (page script, og.png, splash.png)
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Env file to load instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_server(cli.serve).await
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let loader = match &args.env_file {
        Some(path) => ConfigLoader::new().with_env_file(path.clone()),
        None => ConfigLoader::new(),
    };
    let ConfigLoad { config, warnings } =
        loader.load().context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    for warning in warnings.iter() {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }

    info!(
        rpc = %config.chain.rpc_url,
        contract = %config.chain.contract,
        chain_id = config.chain.chain_id,
        auto_connect = %config.auto_connect,
        fallback_total = config.fallback_total.get(),
        "mini app configuration in effect"
    );

    let chain = JsonRpcChainReader::new(config.chain.rpc_url.clone())
        .context("failed to build RPC client")?;
    let limits = SessionLimits {
        idle_timeout: args.session_idle_timeout.into(),
        max_sessions: args.max_sessions,
    };
    let state = AppState::new(Arc::new(config), Arc::new(chain), limits);

    let shutdown = CancellationToken::new();
    let reaper = spawn_session_reaper(
        Arc::clone(&state.sessions),
        REAP_INTERVAL,
        shutdown.clone(),
    );

    if let Some(dir) = &args.static_dir
        && !dir.is_dir()
    {
        warn!(path = %dir.display(), "STATIC_DIR is not a directory; /static will 404");
    }
    let sessions = Arc::clone(&state.sessions);
    let app = create_app(state, args.static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", args.host, args.port))?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(
        %addr,
        idle_timeout = %args.session_idle_timeout,
        max_sessions = args.max_sessions,
        "starting Mint U server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown.cancel();
    let _ = reaper.await;
    let closed = sessions.close_all();
    info!(closed, "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c; shutting down");
    }
}
