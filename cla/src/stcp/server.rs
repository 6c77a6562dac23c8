use super::*;
use futures::{FutureExt, StreamExt};
use std::{net::SocketAddr, panic::AssertUnwindSafe, sync::Arc};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::FramedRead;

/// A data unit declaring this length makes the connection handler panic.
#[cfg(test)]
pub(super) const PANIC_LENGTH: u64 = u64::MAX;

/// Handler panics caught so far, across all servers.
#[cfg(test)]
pub(super) static CAUGHT_PANICS: std::sync::atomic::AtomicUsize =
    std::sync::atomic::AtomicUsize::new(0);

struct Listener {
    address: String,
    endpoint_id: Eid,
    max_data_unit: usize,
    tx: mpsc::Sender<ReceivedBundle>,
    cancel_token: tokio_util::sync::CancellationToken,
    task_tracker: tokio_util::task::TaskTracker,
}

impl core::fmt::Debug for Listener {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listener")
            .field("address", &self.address)
            .field("endpoint_id", &self.endpoint_id)
            .field("max_data_unit", &self.max_data_unit)
            .finish()
    }
}

impl Listener {
    #[cfg_attr(feature = "instrument", instrument(skip(self, listener)))]
    async fn listen(self: Arc<Listener>, listener: TcpListener) {
        loop {
            tokio::select! {
                r = listener.accept() => match r {
                    Ok((stream, remote_addr)) => {
                        debug!("{}: Accepted connection from {remote_addr}", self.address);

                        // Spawn immediately to prevent head-of-line blocking
                        let self_cloned = self.clone();
                        self.task_tracker.spawn(self_cloned.new_contact(stream, remote_addr));
                    }
                    Err(e) => warn!("{}: Failed to accept connection: {e}", self.address),
                },
                _ = self.cancel_token.cancelled() => break
            }
        }
        debug!("{}: Listener stopped", self.address);
    }

    async fn new_contact(self: Arc<Listener>, stream: TcpStream, remote_addr: SocketAddr) {
        if let Err(panic) = AssertUnwindSafe(self.clone().receive(stream, remote_addr))
            .catch_unwind()
            .await
        {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_default();
            #[cfg(test)]
            CAUGHT_PANICS.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            warn!(
                "{}: Handler for {remote_addr} panicked: {reason}",
                self.address
            );
        }
    }

    #[cfg_attr(feature = "instrument", instrument(skip(self, stream)))]
    async fn receive(self: Arc<Listener>, stream: TcpStream, remote_addr: SocketAddr) {
        let mut transport = FramedRead::new(stream, DataUnitCodec::new(self.max_data_unit));
        loop {
            let data_unit = tokio::select! {
                r = transport.next() => match r {
                    Some(Ok(data_unit)) => data_unit,
                    Some(Err(e)) => {
                        warn!(
                            "{}: Reception of data unit from {remote_addr} failed, closing connection: {e}",
                            self.address
                        );
                        break;
                    }
                    None => {
                        debug!("{}: Connection from {remote_addr} closed", self.address);
                        break;
                    }
                },
                _ = self.cancel_token.cancelled() => break
            };

            #[cfg(test)]
            if data_unit.length == PANIC_LENGTH {
                panic!("data unit of length {PANIC_LENGTH}");
            }

            let bundle = match data_unit.to_bundle() {
                Ok(bundle) => bundle,
                Err(e) => {
                    warn!(
                        "{}: Invalid bundle from {remote_addr}, closing connection: {e}",
                        self.address
                    );
                    break;
                }
            };

            debug!(
                "{}: Received bundle {} from {remote_addr}",
                self.address,
                bundle.id()
            );

            tokio::select! {
                r = self.tx.send(ReceivedBundle::new(bundle, self.endpoint_id.clone())) => if r.is_err() {
                    debug!("{}: Receiver dropped, closing connection", self.address);
                    break;
                },
                _ = self.cancel_token.cancelled() => break
            }
        }
    }
}

/// A listening STCP convergence layer.
///
/// Every bundle received on any accepted connection is published on the
/// channel returned by [`ConvergenceReceiver::channel`], tagged with this
/// server's endpoint ID. A connection that sends something undecodable is
/// closed without affecting the others.
pub struct StcpServer {
    config: config::Config,
    endpoint_id: Eid,
    tx: Option<mpsc::Sender<ReceivedBundle>>,
    rx: Option<mpsc::Receiver<ReceivedBundle>>,
    local_addr: Option<SocketAddr>,
    cancel_token: tokio_util::sync::CancellationToken,
    task_tracker: tokio_util::task::TaskTracker,
}

impl StcpServer {
    pub fn new(endpoint_id: Eid, config: config::Config) -> Self {
        if config.channel_capacity == 0 {
            warn!(
                "stcp://{}: Channel capacity of 0 is not supported, using 1",
                config.address
            );
        }
        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
        Self {
            config,
            endpoint_id,
            tx: Some(tx),
            rx: Some(rx),
            local_addr: None,
            cancel_token: tokio_util::sync::CancellationToken::new(),
            task_tracker: tokio_util::task::TaskTracker::new(),
        }
    }

    /// The bound socket address, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }
}

#[async_trait]
impl Convergence for StcpServer {
    #[cfg_attr(feature = "instrument", instrument(skip(self)))]
    async fn start(&mut self) -> Result<()> {
        if self.local_addr.is_some() || self.cancel_token.is_cancelled() {
            return Err(Error::AlreadyStarted);
        }
        let Some(tx) = self.tx.clone() else {
            return Err(Error::AlreadyStarted);
        };

        let address = tokio::net::lookup_host(&self.config.address)
            .await
            .map_err(|source| Error::Resolve {
                address: self.config.address.clone(),
                source,
            })?
            .next()
            .ok_or_else(|| Error::Resolve {
                address: self.config.address.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no addresses found",
                ),
            })?;

        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| Error::Bind { address, source })?;
        let local_addr = listener.local_addr()?;

        info!("{}: Listening on {local_addr}", self);

        self.tx = None;
        self.local_addr = Some(local_addr);

        let listener_state = Arc::new(Listener {
            address: self.address(),
            endpoint_id: self.endpoint_id.clone(),
            max_data_unit: self.config.max_data_unit,
            tx,
            cancel_token: self.cancel_token.clone(),
            task_tracker: self.task_tracker.clone(),
        });
        self.task_tracker.spawn(listener_state.listen(listener));
        Ok(())
    }

    #[cfg_attr(feature = "instrument", instrument(skip(self)))]
    async fn close(&mut self) {
        self.tx = None;
        self.cancel_token.cancel();
        self.task_tracker.close();
        self.task_tracker.wait().await;
        debug!("{}: Closed", self);
    }

    fn address(&self) -> String {
        format!("stcp://{}", self.config.address)
    }

    fn is_permanent(&self) -> bool {
        self.config.permanent
    }
}

impl ConvergenceReceiver for StcpServer {
    fn channel(&mut self) -> Option<mpsc::Receiver<ReceivedBundle>> {
        self.rx.take()
    }

    fn endpoint_id(&self) -> &Eid {
        &self.endpoint_id
    }
}

impl core::fmt::Display for StcpServer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.address())
    }
}
