use super::*;
use futures::SinkExt;
use tokio::net::TcpStream;
use tokio_util::codec::FramedWrite;

/// An STCP convergence layer sending bundles to a single remote server.
pub struct StcpClient {
    address: String,
    peer_endpoint_id: Eid,
    permanent: bool,
    transport: Option<FramedWrite<TcpStream, DataUnitCodec>>,
}

impl StcpClient {
    pub fn new(address: impl Into<String>, peer_endpoint_id: Eid, permanent: bool) -> Self {
        Self {
            address: address.into(),
            peer_endpoint_id,
            permanent,
            transport: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }
}

#[async_trait]
impl Convergence for StcpClient {
    #[cfg_attr(feature = "instrument", instrument(skip(self)))]
    async fn start(&mut self) -> Result<()> {
        if self.transport.is_some() {
            return Err(Error::AlreadyStarted);
        }

        let address = tokio::net::lookup_host(&self.address)
            .await
            .map_err(|source| Error::Resolve {
                address: self.address.clone(),
                source,
            })?
            .next()
            .ok_or_else(|| Error::Resolve {
                address: self.address.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses found"),
            })?;

        let stream = TcpStream::connect(address)
            .await
            .map_err(|source| Error::Connect { address, source })?;

        debug!("{}: Connected to {address}", self);

        self.transport = Some(FramedWrite::new(stream, DataUnitCodec::default()));
        Ok(())
    }

    #[cfg_attr(feature = "instrument", instrument(skip(self)))]
    async fn close(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            if let Err(e) = transport.close().await {
                debug!("{}: Failed to shut down connection: {e}", self);
            }
        }
    }

    fn address(&self) -> String {
        format!("stcp://{}", self.address)
    }

    fn is_permanent(&self) -> bool {
        self.permanent
    }
}

#[async_trait]
impl ConvergenceSender for StcpClient {
    #[cfg_attr(feature = "instrument", instrument(skip_all))]
    async fn send(&mut self, bundle: &Bundle) -> Result<()> {
        let transport = self.transport.as_mut().ok_or(Error::NotConnected)?;
        transport.send(DataUnit::new(bundle)).await
    }

    fn peer_endpoint_id(&self) -> &Eid {
        &self.peer_endpoint_id
    }
}

impl core::fmt::Display for StcpClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.address(), self.peer_endpoint_id)
    }
}
