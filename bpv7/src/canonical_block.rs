/*!
Canonical blocks: the payload block and every extension block.

The block-type-specific data is a closed sum type, [`BlockData`]. The block
type selects which variant is expected, both when decoding and when checking
validity, through a single mapping in [`BlockData::parse`] and
[`BlockData::matches`].
*/

use super::*;
use error::CaptureFieldErr;

/// The block-type-specific data of a canonical block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockData {
    /// The payload, and the opaque content of every other block type.
    Bytes(Box<[u8]>),
    PreviousNode(Eid),
    /// Bundle age in microseconds.
    BundleAge(u64),
    HopCount(HopCount),
}

impl BlockData {
    fn parse(block_type: BlockType, array: &mut cbor::decode::Array) -> Result<Self, Error> {
        match block_type {
            BlockType::PreviousNode => Ok(Self::PreviousNode(array.parse()?)),
            BlockType::BundleAge => Ok(Self::BundleAge(array.parse()?)),
            BlockType::HopCount => Ok(Self::HopCount(array.parse()?)),
            BlockType::Payload
            | BlockType::Integrity
            | BlockType::Confidentiality
            | BlockType::Manifest
            | BlockType::FlowLabel
            | BlockType::Private(_)
            | BlockType::Unrecognised(_) => Ok(Self::Bytes(array.parse()?)),
        }
    }

    /// Returns `true` if this is the variant that `block_type` carries.
    pub fn matches(&self, block_type: BlockType) -> bool {
        match block_type {
            BlockType::PreviousNode => matches!(self, Self::PreviousNode(_)),
            BlockType::BundleAge => matches!(self, Self::BundleAge(_)),
            BlockType::HopCount => matches!(self, Self::HopCount(_)),
            BlockType::Payload
            | BlockType::Integrity
            | BlockType::Confidentiality
            | BlockType::Manifest
            | BlockType::FlowLabel
            | BlockType::Private(_)
            | BlockType::Unrecognised(_) => matches!(self, Self::Bytes(_)),
        }
    }
}

impl cbor::encode::ToCbor for BlockData {
    fn to_cbor(&self, encoder: &mut cbor::encode::Encoder) {
        match self {
            Self::Bytes(data) => encoder.emit(&cbor::encode::Bytes(data)),
            Self::PreviousNode(eid) => encoder.emit(eid),
            Self::BundleAge(age) => encoder.emit(age),
            Self::HopCount(hop_count) => encoder.emit(hop_count),
        }
    }
}

impl core::fmt::Display for BlockData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bytes(data) => f.write_str(&hex(data)),
            Self::PreviousNode(eid) => write!(f, "{eid}"),
            Self::BundleAge(age) => write!(f, "{age}us"),
            Self::HopCount(hop_count) => write!(f, "{hop_count}"),
        }
    }
}

pub(crate) fn hex(data: &[u8]) -> String {
    data.iter().fold(String::with_capacity(data.len() * 2), |mut s, b| {
        s.push_str(&format!("{b:02x}"));
        s
    })
}

/// A canonical block.
///
/// The CRC value is `Some` only once it has been calculated or decoded.
/// Blocks with a CRC type but no value encode a zero-filled CRC field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CanonicalBlock {
    pub block_type: BlockType,
    pub block_number: u64,
    pub flags: BlockControlFlags,
    pub crc_type: CrcType,
    pub data: BlockData,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub crc: Option<Box<[u8]>>,
}

impl CanonicalBlock {
    pub fn new(
        block_type: BlockType,
        block_number: u64,
        flags: BlockControlFlags,
        data: BlockData,
    ) -> Self {
        Self {
            block_type,
            block_number,
            flags,
            crc_type: CrcType::None,
            data,
            crc: None,
        }
    }

    /// Creates a payload block. The payload block is always block number 0.
    pub fn new_payload_block(flags: BlockControlFlags, data: impl Into<Box<[u8]>>) -> Self {
        Self::new(BlockType::Payload, 0, flags, BlockData::Bytes(data.into()))
    }

    pub fn new_previous_node_block(block_number: u64, flags: BlockControlFlags, eid: Eid) -> Self {
        Self::new(
            BlockType::PreviousNode,
            block_number,
            flags,
            BlockData::PreviousNode(eid),
        )
    }

    /// Creates a bundle age block, with the age in microseconds.
    pub fn new_bundle_age_block(block_number: u64, flags: BlockControlFlags, age: u64) -> Self {
        Self::new(
            BlockType::BundleAge,
            block_number,
            flags,
            BlockData::BundleAge(age),
        )
    }

    pub fn new_hop_count_block(
        block_number: u64,
        flags: BlockControlFlags,
        hop_count: HopCount,
    ) -> Self {
        Self::new(
            BlockType::HopCount,
            block_number,
            flags,
            BlockData::HopCount(hop_count),
        )
    }

    pub fn has_crc(&self) -> bool {
        self.crc_type != CrcType::None
    }

    /// Sets the CRC type, discarding any stored CRC value.
    pub fn set_crc_type(&mut self, crc_type: CrcType) {
        self.crc_type = crc_type;
        self.crc = None;
    }

    /// Calculates and stores the CRC value.
    pub fn calculate_crc(&mut self) {
        self.crc = match self.crc_type {
            CrcType::None => None,
            _ => Some(crc::calculate_crc(self)),
        };
    }

    pub fn check_crc(&self) -> bool {
        crc::check_crc(self)
    }

    /// The raw content of a block carrying bytes, such as the payload.
    pub fn payload(&self) -> Option<&[u8]> {
        match &self.data {
            BlockData::Bytes(data) => Some(data),
            _ => None,
        }
    }

    /// Checks every structural rule, reporting all violations.
    pub fn check_valid(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        if let Err(e) = self.flags.check_valid() {
            errors.push(e);
        }
        match self.block_type {
            BlockType::Payload if self.block_number != 0 => errors.push(
                Error::InvalidBlockNumber(self.block_number, self.block_type),
            ),
            BlockType::Payload => {}
            BlockType::Unrecognised(code) => errors.push(Error::UnknownBlockType(code)),
            _ if self.block_number == 0 => errors.push(Error::InvalidBlockNumber(
                self.block_number,
                self.block_type,
            )),
            _ => {}
        }
        if let BlockData::PreviousNode(eid) = &self.data {
            if let Err(e) = eid.check_valid() {
                errors.push(e.into());
            }
        }
        if !self.data.matches(self.block_type) {
            errors.push(Error::InvalidBlockData(self.block_type));
        }
        ValidationErrors::into_result(errors)
    }
}

impl crc::CrcBlock for CanonicalBlock {
    fn crc_type(&self) -> CrcType {
        self.crc_type
    }

    fn crc_value(&self) -> Option<&[u8]> {
        self.crc.as_deref()
    }

    fn emit_with_crc(&self, encoder: &mut cbor::encode::Encoder, crc: &[u8]) {
        encoder.emit_array(Some(if self.has_crc() { 6 } else { 5 }), |a| {
            a.emit(&self.block_type);
            a.emit(&self.block_number);
            a.emit(&self.flags);
            a.emit(&self.crc_type);
            a.emit(&self.data);
            if self.has_crc() {
                a.emit(&cbor::encode::Bytes(crc));
            }
        })
    }
}

impl cbor::encode::ToCbor for CanonicalBlock {
    fn to_cbor(&self, encoder: &mut cbor::encode::Encoder) {
        match &self.crc {
            Some(crc) => self.emit_with_crc(encoder, crc),
            None => self.emit_with_crc(encoder, &crc::empty_crc(self.crc_type)),
        }
    }
}

impl cbor::decode::FromCbor for CanonicalBlock {
    type Error = Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        cbor::decode::try_parse_array(data, |a, _| {
            if let Some(len) = a.len() {
                if len != 5 && len != 6 {
                    return Err(Error::InvalidBlockLength(len));
                }
            }

            let block_type = a.parse().map_field_err("block type code")?;
            let block_number = a.parse().map_field_err("block number")?;
            let flags = a
                .parse()
                .map_field_err("block processing control flags")?;
            let crc_type = a.parse().map_field_err("CRC type")?;
            let data =
                BlockData::parse(block_type, a).map_field_err("block-type-specific data")?;
            let crc = a.try_parse::<Box<[u8]>>().map_field_err("CRC value")?;

            if !a.end()? {
                // Indefinite-length array with trailing items
                let mut len = a.parsed();
                while a.skip_value(16)? {
                    len += 1;
                }
                return Err(Error::InvalidBlockLength(len));
            }

            Ok(CanonicalBlock {
                block_type,
                block_number,
                flags,
                crc_type,
                data,
                crc,
            })
        })
    }
}

impl core::fmt::Display for CanonicalBlock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "block type: {}, number: {}, flags: {}, crc type: {}, data: {}",
            self.block_type, self.block_number, self.flags, self.crc_type, self.data
        )?;
        match &self.crc {
            Some(crc) => write!(f, ", crc: {}", hex(crc)),
            None => Ok(()),
        }
    }
}
