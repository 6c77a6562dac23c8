/*!
Block CRCs.

A CRC is computed over the canonical CBOR encoding of a block with the CRC
field present but zero-filled. The computation works on a fresh encoding, so
it never modifies the block and can run against a shared reference.
*/

use super::*;

const X25: ::crc::Crc<u16> = ::crc::Crc::<u16>::new(&::crc::CRC_16_IBM_SDLC);
const CASTAGNOLI: ::crc::Crc<u32> = ::crc::Crc::<u32>::new(&::crc::CRC_32_ISCSI);

#[allow(non_camel_case_types)]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrcType {
    #[default]
    None,
    CRC16_X25,
    CRC32_CASTAGNOLI,
}

impl CrcType {
    /// The length in bytes of a CRC value of this type.
    pub fn width(&self) -> usize {
        match self {
            CrcType::None => 0,
            CrcType::CRC16_X25 => 2,
            CrcType::CRC32_CASTAGNOLI => 4,
        }
    }
}

impl TryFrom<u64> for CrcType {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::CRC16_X25),
            2 => Ok(Self::CRC32_CASTAGNOLI),
            v => Err(Error::InvalidCrcType(v)),
        }
    }
}

impl From<CrcType> for u64 {
    fn from(value: CrcType) -> Self {
        match value {
            CrcType::None => 0,
            CrcType::CRC16_X25 => 1,
            CrcType::CRC32_CASTAGNOLI => 2,
        }
    }
}

impl core::fmt::Display for CrcType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CrcType::None => f.write_str("none"),
            CrcType::CRC16_X25 => f.write_str("CRC-16 (X.25)"),
            CrcType::CRC32_CASTAGNOLI => f.write_str("CRC-32 (Castagnoli)"),
        }
    }
}

impl cbor::encode::ToCbor for CrcType {
    fn to_cbor(&self, encoder: &mut cbor::encode::Encoder) {
        encoder.emit(&u64::from(*self))
    }
}

impl cbor::decode::FromCbor for CrcType {
    type Error = self::Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        match cbor::decode::try_parse::<u64>(data)? {
            Some((v, len)) => Ok(Some((v.try_into()?, len))),
            None => Ok(None),
        }
    }
}

/// A block that carries a CRC field.
pub trait CrcBlock {
    fn crc_type(&self) -> CrcType;

    /// The stored CRC value, if one has been calculated or decoded.
    fn crc_value(&self) -> Option<&[u8]>;

    /// Emits the canonical encoding of the block, using `crc` as the content
    /// of the CRC field. The field is omitted when the CRC type is none.
    fn emit_with_crc(&self, encoder: &mut cbor::encode::Encoder, crc: &[u8]);
}

/// A zero-filled CRC value of the width of `crc_type`.
pub fn empty_crc(crc_type: CrcType) -> Box<[u8]> {
    vec![0; crc_type.width()].into()
}

/// The canonical encoding of `block` with a blank CRC field.
pub fn block_to_bytes<B>(block: &B) -> Vec<u8>
where
    B: CrcBlock + ?Sized,
{
    let mut encoder = cbor::encode::Encoder::new();
    block.emit_with_crc(&mut encoder, &empty_crc(block.crc_type()));
    encoder.build()
}

/// Computes the CRC of `block`, big-endian, as wide as its CRC type.
pub fn calculate_crc<B>(block: &B) -> Box<[u8]>
where
    B: CrcBlock + ?Sized,
{
    match block.crc_type() {
        CrcType::None => Box::default(),
        CrcType::CRC16_X25 => X25.checksum(&block_to_bytes(block)).to_be_bytes().into(),
        CrcType::CRC32_CASTAGNOLI => CASTAGNOLI
            .checksum(&block_to_bytes(block))
            .to_be_bytes()
            .into(),
    }
}

/// Checks the stored CRC of `block` against a fresh calculation.
///
/// A block with no CRC type always passes; a block with a CRC type but no
/// stored value always fails.
pub fn check_crc<B>(block: &B) -> bool
where
    B: CrcBlock + ?Sized,
{
    if block.crc_type() == CrcType::None {
        return true;
    }
    block
        .crc_value()
        .is_some_and(|crc| *crc == *calculate_crc(block))
}
