use super::config::Config;
use drift_cla::{Convergence, stcp::StcpServer};
use std::time::Duration;
use tracing::{error, info, warn};

/// Starts `cla`, retrying failures that may clear up on their own.
pub async fn start_with_retry<C>(cla: &mut C, attempts: u32, interval: Duration) -> drift_cla::Result<()>
where
    C: Convergence + ?Sized,
{
    let mut attempt = 1;
    loop {
        match cla.start().await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_retryable() && attempt < attempts => {
                warn!("{cla}: Start attempt {attempt} of {attempts} failed, retrying in {interval:?}: {e}");
                attempt += 1;
                tokio::time::sleep(interval).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Starts every configured listener.
///
/// A listener that cannot be started aborts startup, unless it only ran out
/// of retries and is not permanent, in which case it is left out.
pub async fn start_all(config: &Config) -> anyhow::Result<Vec<StcpServer>> {
    let interval = Duration::from_millis(config.retry_interval_ms);
    let mut servers = Vec::new();

    for listener in &config.listeners {
        let mut server = StcpServer::new(config.node_id.clone(), listener.clone());
        match start_with_retry(&mut server, config.start_attempts, interval).await {
            Ok(()) => {
                if let Some(local_addr) = server.local_addr() {
                    info!("{server}: Started on {local_addr}");
                }
                servers.push(server);
            }
            Err(e) if e.is_retryable() && !server.is_permanent() => {
                error!("{server}: Giving up after {} attempts: {e}", config.start_attempts);
            }
            Err(e) => {
                for server in &mut servers {
                    server.close().await;
                }
                return Err(anyhow::Error::new(e).context(format!("Failed to start {server}")));
            }
        }
    }

    if servers.is_empty() {
        anyhow::bail!("No STCP listeners could be started");
    }
    Ok(servers)
}
