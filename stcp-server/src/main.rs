use clap::Parser;
use drift_cla::{Convergence, ConvergenceReceiver};
use std::path::PathBuf;
use tracing::info;

mod agent;
mod config;
mod listeners;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = config::load(args.config)?;

    info!("Starting STCP server (node: {})", config.node_id);

    let mut servers = listeners::start_all(&config).await?;
    let feed = drift_cla::join_receivers(servers.iter_mut().filter_map(|s| s.channel()));

    let local_agent = agent::LoggingAgent::new(config.node_id.clone());
    let delivery = tokio::spawn(async move {
        agent::deliver_all(feed, &local_agent).await;
        local_agent.delivered()
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    for server in &mut servers {
        server.close().await;
    }
    let delivered = delivery.await?;

    info!("Stopped after delivering {delivered} bundles");
    Ok(())
}
