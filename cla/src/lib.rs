/*!
Convergence layer adapters.

A convergence layer adapter (CLA) moves bundles over some underlying
transport. Receiving CLAs publish every bundle they decode as a
[`ReceivedBundle`] on a channel; [`join_receivers`] fans any number of those
channels into one feed for the rest of the node.

The [`stcp`] module provides a simple TCP convergence layer: a stream of
CBOR data units, each carrying one encoded bundle, with no session
handshake.
*/

use async_trait::async_trait;
use drift_bpv7::prelude::{Bundle, Eid};
use drift_cbor as cbor;
use thiserror::Error;
use tokio::sync::mpsc;

mod agent;
mod merge;
mod received_bundle;

pub mod stcp;

pub use agent::ApplicationAgent;
pub use merge::{join_receivers, merge};
pub use received_bundle::ReceivedBundle;

/// A specialized `Result` type for CLA operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur during CLA operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured address could not be resolved.
    #[error("Failed to resolve address {address}: {source}")]
    Resolve {
        address: String,
        source: std::io::Error,
    },

    /// The resolved address could not be bound.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: std::net::SocketAddr,
        source: std::io::Error,
    },

    /// The remote peer could not be reached.
    #[error("Failed to connect to {address}: {source}")]
    Connect {
        address: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("The convergence layer has already been started")]
    AlreadyStarted,

    #[error("The convergence layer is not connected")]
    NotConnected,

    /// A data unit exceeded the configured maximum size.
    #[error("Data unit of {0} bytes exceeds the maximum length")]
    DataUnitTooLarge(usize),

    /// The length field of a data unit disagrees with its content.
    #[error("Data unit declares {declared} bytes but carries {actual}")]
    LengthMismatch { declared: u64, actual: usize },

    #[error(transparent)]
    InvalidCbor(#[from] cbor::decode::Error),

    #[error(transparent)]
    InvalidBundle(#[from] drift_bpv7::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An application agent refused a bundle.
    #[error(transparent)]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Whether a failed `start` may succeed if attempted again later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Bind { .. } | Error::Connect { .. })
    }
}

/// The lifecycle shared by every convergence layer adapter.
#[async_trait]
pub trait Convergence: core::fmt::Display + Send {
    /// Starts the adapter. On failure, [`Error::is_retryable`] tells the
    /// caller whether another attempt makes sense.
    async fn start(&mut self) -> Result<()>;

    /// Stops the adapter, waiting for all of its tasks to finish.
    async fn close(&mut self);

    /// A unique address, used to identify the adapter and ensure it is not
    /// opened twice.
    fn address(&self) -> String;

    /// Whether the adapter should be kept after failures.
    fn is_permanent(&self) -> bool;
}

/// An adapter that receives bundles.
pub trait ConvergenceReceiver: Convergence {
    /// Takes the channel of received bundles. Only the first call returns
    /// `Some`; the channel closes once the adapter has been closed.
    fn channel(&mut self) -> Option<mpsc::Receiver<ReceivedBundle>>;

    /// The local endpoint that bundles are received on.
    fn endpoint_id(&self) -> &Eid;
}

/// An adapter that transmits bundles to a single peer.
#[async_trait]
pub trait ConvergenceSender: Convergence {
    async fn send(&mut self, bundle: &Bundle) -> Result<()>;

    fn peer_endpoint_id(&self) -> &Eid;
}
