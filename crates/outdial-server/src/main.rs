//! OUTDIAL server binary: HTTP ingress over the campaign engine, wired to
//! the simulated telephony provider.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use outdial_engine::prelude::*;
use outdial_server::router;

#[derive(Parser, Debug)]
#[command(name = "outdial", about = "Outbound call campaign server", version)]
struct Args {
    /// Address for the HTTP ingress surface
    #[arg(long, default_value = "0.0.0.0:7000")]
    bind: SocketAddr,

    /// Ring timeout in seconds
    #[arg(long, default_value_t = 45)]
    ring_timeout: u64,

    /// Gap between unsuccessful phases in seconds
    #[arg(long, default_value_t = 4)]
    retry_gap: u64,

    /// Answer probability of the simulated telephony provider
    #[arg(long, default_value_t = 0.30)]
    answer_probability: f64,

    /// Simulated ring duration in seconds
    #[arg(long, default_value_t = 3)]
    ring_delay: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = CampaignConfig::default();
    config.general.bind_addr = args.bind;
    config.dialer.ring_timeout = Duration::from_secs(args.ring_timeout);
    config.dialer.retry_gap = Duration::from_secs(args.retry_gap);

    // The engine has no function without a telephony provider; failure to
    // set one up aborts the process.
    let provider = Arc::new(SimulatedTelephony::with_behavior(
        args.answer_probability,
        Duration::from_secs(args.ring_delay),
    ));

    let mut server = CampaignServerBuilder::new()
        .with_config(config.clone())
        .with_provider(provider)
        .build()
        .context("failed to build campaign server")?;
    server.start().context("failed to start dial worker")?;

    let app = router(server.engine());
    let listener = tokio::net::TcpListener::bind(config.general.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.general.bind_addr))?;
    info!("🌐 ingress listening on {}", config.general.bind_addr);

    axum::serve(listener, app)
        .await
        .context("ingress server failed")?;
    Ok(())
}
