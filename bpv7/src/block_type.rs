use super::*;

/// The type of a canonical block.
///
/// Codes 192 to 255 are reserved for private and experimental use and are
/// carried as opaque bytes; any other unassigned code is unrecognised and
/// rejected by validation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockType {
    Payload,
    Integrity,
    Confidentiality,
    Manifest,
    FlowLabel,
    PreviousNode,
    BundleAge,
    HopCount,
    Private(u64),
    Unrecognised(u64),
}

impl BlockType {
    pub const PRIVATE_RANGE: core::ops::RangeInclusive<u64> = 192..=255;
}

impl From<BlockType> for u64 {
    fn from(value: BlockType) -> Self {
        match value {
            BlockType::Payload => 1,
            BlockType::Integrity => 2,
            BlockType::Confidentiality => 3,
            BlockType::Manifest => 4,
            BlockType::FlowLabel => 6,
            BlockType::PreviousNode => 7,
            BlockType::BundleAge => 8,
            BlockType::HopCount => 9,
            BlockType::Private(v) | BlockType::Unrecognised(v) => v,
        }
    }
}

impl From<u64> for BlockType {
    fn from(value: u64) -> Self {
        match value {
            1 => BlockType::Payload,
            2 => BlockType::Integrity,
            3 => BlockType::Confidentiality,
            4 => BlockType::Manifest,
            6 => BlockType::FlowLabel,
            7 => BlockType::PreviousNode,
            8 => BlockType::BundleAge,
            9 => BlockType::HopCount,
            v if Self::PRIVATE_RANGE.contains(&v) => BlockType::Private(v),
            v => BlockType::Unrecognised(v),
        }
    }
}

impl core::fmt::Display for BlockType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BlockType::Payload => f.write_str("Payload"),
            BlockType::Integrity => f.write_str("Integrity"),
            BlockType::Confidentiality => f.write_str("Confidentiality"),
            BlockType::Manifest => f.write_str("Manifest"),
            BlockType::FlowLabel => f.write_str("Flow Label"),
            BlockType::PreviousNode => f.write_str("Previous Node"),
            BlockType::BundleAge => f.write_str("Bundle Age"),
            BlockType::HopCount => f.write_str("Hop Count"),
            BlockType::Private(v) => write!(f, "Private({v})"),
            BlockType::Unrecognised(v) => write!(f, "Unrecognised({v})"),
        }
    }
}

impl cbor::encode::ToCbor for BlockType {
    fn to_cbor(&self, encoder: &mut cbor::encode::Encoder) {
        encoder.emit(&u64::from(*self))
    }
}

impl cbor::decode::FromCbor for BlockType {
    type Error = cbor::decode::Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        cbor::decode::try_parse::<u64>(data).map(|o| o.map(|(v, len)| (v.into(), len)))
    }
}
