//! Simple TCP convergence layer.
//!
//! Each connection carries a plain sequence of data units, each a CBOR array
//! `[length, bundle]` where `bundle` is the encoded bundle as a byte string.
//! There is no contact header, session negotiation or acknowledgement.

use super::*;
use tracing::{debug, info, warn};

#[cfg(feature = "instrument")]
use tracing::instrument;

mod client;
mod codec;
mod data_unit;
mod server;

pub mod config;

pub use client::StcpClient;
pub use codec::DataUnitCodec;
pub use data_unit::DataUnit;
pub use server::StcpServer;
