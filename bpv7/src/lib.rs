/*!
Bundle Protocol block encoding.

This crate provides the wire representation of bundles: the primary block,
the typed canonical (extension and payload) blocks, their CRC integrity
fields, and the structural validity rules a receiver applies before handing
a bundle to the rest of the node.

All encoding and decoding is CBOR, via `drift-cbor`. Decoding untrusted data
never panics; failures are reported as [`Error`] values, and structural
validation collects every violation it finds into a [`ValidationErrors`].
*/

use drift_cbor as cbor;

mod block_flags;
mod block_type;
mod bundle;
mod bundle_flags;
mod canonical_block;
mod creation_timestamp;
mod dtn_time;
mod error;
mod hop_count;
mod primary_block;

pub mod crc;
pub mod eid;

pub use error::{Error, ValidationErrors};



pub mod prelude {
    pub use super::block_flags::BlockControlFlags;
    pub use super::block_type::BlockType;
    pub use super::bundle::Bundle;
    pub use super::bundle_flags::BundleControlFlags;
    pub use super::canonical_block::{BlockData, CanonicalBlock};
    pub use super::crc::{CrcBlock, CrcType};
    pub use super::creation_timestamp::CreationTimestamp;
    pub use super::dtn_time::DtnTime;
    pub use super::eid::Eid;
    pub use super::error::{Error, ValidationErrors};
    pub use super::hop_count::HopCount;
    pub use super::primary_block::{FragmentInfo, PrimaryBlock};
}

use prelude::*;
