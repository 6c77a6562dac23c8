use super::*;
use error::CaptureFieldErr;

/// The payload of a Hop Count block.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HopCount {
    pub limit: u64,
    pub count: u64,
}

impl HopCount {
    pub fn new(limit: u64) -> Self {
        Self { limit, count: 0 }
    }

    pub fn is_exceeded(&self) -> bool {
        self.count > self.limit
    }

    /// Records one more hop, returning `true` if the limit is now exceeded.
    pub fn increment(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        self.is_exceeded()
    }
}

impl core::fmt::Display for HopCount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.count, self.limit)
    }
}

impl cbor::encode::ToCbor for HopCount {
    fn to_cbor(&self, encoder: &mut cbor::encode::Encoder) {
        encoder.emit(&(self.limit, self.count))
    }
}

impl cbor::decode::FromCbor for HopCount {
    type Error = Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        cbor::decode::try_parse_array(data, |a, _| {
            Ok(HopCount {
                limit: a.parse().map_field_err("hop limit")?,
                count: a.parse().map_field_err("hop count")?,
            })
        })
    }
}
