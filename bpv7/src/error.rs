/*!
The error types for the `bpv7` crate.

`Error` covers both decoding failures and individual structural validation
failures. Validation does not stop at the first problem: `check_valid` methods
return a [`ValidationErrors`] listing every violation found.
*/

use super::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Indicates that there is additional data after the end of a CBOR array in a bundle.
    #[error("Bundle has additional data after end of CBOR array")]
    AdditionalData,

    #[error("Unsupported bundle protocol version {0}")]
    InvalidVersion(u64),

    /// A block array must have exactly 5 or 6 elements (8 to 11 for the primary block).
    #[error("Block array has invalid length {0}")]
    InvalidBlockLength(usize),

    #[error("Invalid CRC type {0}")]
    InvalidCrcType(u64),

    #[error("Block control flags {0:#04x} have reserved bits set")]
    ReservedBlockFlags(u8),

    #[error("Bundle control flags {0:#x} have reserved bits set")]
    ReservedBundleFlags(u64),

    #[error("Bundle with an anonymous source must not be fragmented and must not request status reports")]
    AnonymousSourceFlags,

    #[error("Fragment fields do not match the 'is fragment' bundle flag")]
    InvalidFragmentInfo,

    #[error("Invalid fragment information: offset {0}, total length {1}")]
    InvalidFragmentOffset(u64, u64),

    #[error("{1} block cannot be block number {0}")]
    InvalidBlockNumber(u64, BlockType),

    #[error("Unknown block type code {0}")]
    UnknownBlockType(u64),

    #[error("{0} block has block-type-specific data of the wrong kind")]
    InvalidBlockData(BlockType),

    #[error("Bundle has no payload block")]
    MissingPayload,

    #[error("Bundle has more than one block with block number {0}")]
    DuplicateBlockNumber(u64),

    #[error("Bundle has multiple {0} blocks")]
    DuplicateBlocks(BlockType),

    /// The bundle source has no clock, so the bundle needs a Bundle Age block.
    #[error("Bundle source has no clock, and there is no Bundle Age extension block")]
    MissingBundleAge,

    #[error(transparent)]
    InvalidEid(#[from] eid::Error),

    #[error(transparent)]
    InvalidCBOR(#[from] cbor::decode::Error),

    /// A generic error for when parsing a specific field fails.
    #[error("Failed to parse {field}: {source}")]
    InvalidField {
        field: &'static str,
        source: Box<dyn core::error::Error + Send + Sync>,
    },
}

/// A trait for mapping errors to an `Error::InvalidField`.
pub trait CaptureFieldErr<T> {
    fn map_field_err(self, field: &'static str) -> Result<T, Error>;
}

impl<T, E: Into<Box<dyn core::error::Error + Send + Sync>>> CaptureFieldErr<T>
    for core::result::Result<T, E>
{
    fn map_field_err(self, field: &'static str) -> Result<T, Error> {
        self.map_err(|e| Error::InvalidField {
            field,
            source: e.into(),
        })
    }
}

/// Every structural problem found by a `check_valid` call.
#[derive(Debug, Default)]
pub struct ValidationErrors(Vec<Error>);

impl ValidationErrors {
    pub(crate) fn into_result(errors: Vec<Error>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self(errors))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Error> {
        self.0.iter()
    }
}

impl From<Error> for ValidationErrors {
    fn from(value: Error) -> Self {
        Self(vec![value])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a Error;
    type IntoIter = core::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl core::error::Error for ValidationErrors {}
