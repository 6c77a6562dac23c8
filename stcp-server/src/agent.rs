use async_trait::async_trait;
use drift_bpv7::prelude::{Bundle, Eid};
use drift_cla::{ApplicationAgent, ReceivedBundle};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// An application agent that logs every bundle it is given.
pub struct LoggingAgent {
    endpoint_id: Eid,
    delivered: AtomicU64,
}

impl LoggingAgent {
    pub fn new(endpoint_id: Eid) -> Self {
        Self {
            endpoint_id,
            delivered: AtomicU64::new(0),
        }
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ApplicationAgent for LoggingAgent {
    fn endpoint_id(&self) -> &Eid {
        &self.endpoint_id
    }

    async fn deliver(&self, bundle: &Bundle) -> drift_cla::Result<()> {
        let Some(payload) = bundle.payload() else {
            return Err(drift_bpv7::Error::MissingPayload.into());
        };
        info!(
            "{}: Delivered bundle {} for {} ({} byte payload)",
            self.endpoint_id,
            bundle.id(),
            bundle.primary.destination,
            payload.len()
        );
        self.delivered.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Validates every received bundle and hands the valid ones to `agent`,
/// until the feed closes.
pub async fn deliver_all(mut feed: mpsc::Receiver<ReceivedBundle>, agent: &dyn ApplicationAgent) {
    while let Some(received) = feed.recv().await {
        if let Err(e) = received.bundle.check_valid() {
            warn!(
                "Dropping invalid bundle {} received by {}: {e}",
                received.bundle.id(),
                received.receiver
            );
            continue;
        }

        if let Err(e) = agent.deliver(&received.bundle).await {
            warn!(
                "{}: Failed to deliver bundle {}: {e}",
                agent.endpoint_id(),
                received.bundle.id()
            );
        }
    }
    debug!("Bundle feed closed");
}
