use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use flexselect::{config::FlexSelectConfig, demo, web::build_router};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "flexselect")]
#[command(about = "Demo admin serving flex select widgets")]
struct Cli {
    /// Address to bind (overrides FLEXSELECT_HOST)
    #[arg(long)]
    host: Option<String>,
    /// Port to bind (overrides FLEXSELECT_PORT)
    #[arg(long)]
    port: Option<u16>,
    /// Load jQuery from the CDN on admin pages
    #[arg(long)]
    include_jquery: bool,
    /// Directory holding the widget script (overrides FLEXSELECT_STATIC_DIR)
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = FlexSelectConfig::from_env().context("failed to load configuration")?;
    if let Some(host) = cli.host {
        config = config.host(host);
    }
    if let Some(port) = cli.port {
        config = config.port(port);
    }
    if cli.include_jquery {
        config = config.include_jquery(true);
    }
    if let Some(dir) = cli.static_dir {
        config = config.static_dir(dir);
    }

    let addr = config.address();
    let state = demo::app_state(config, bcrypt::DEFAULT_COST)
        .context("failed to build demo admin")?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(address = %addr, "flexselect admin started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("flexselect=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
