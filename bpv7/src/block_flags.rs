use super::*;

/// The processing control flags of a canonical block.
///
/// Only the low four bits are defined; the high four are reserved and must be
/// zero. The defined bits are independent of each other, so any combination
/// of them is valid.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockControlFlags(u8);

impl BlockControlFlags {
    /// Replicate the block in every fragment.
    pub const REPLICATE: Self = Self(0x01);
    /// Remove the block from the bundle if it cannot be processed.
    pub const REMOVE_BLOCK: Self = Self(0x02);
    /// Transmit a status report if the block cannot be processed.
    pub const STATUS_REPORT: Self = Self(0x04);
    /// Delete the bundle if the block cannot be processed.
    pub const DELETE_BUNDLE: Self = Self(0x08);

    const RESERVED: u8 = 0xF0;

    pub const fn new(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Returns `true` if any bit of `mask` is set.
    pub fn has(&self, mask: Self) -> bool {
        self.0 & mask.0 != 0
    }

    pub fn check_valid(&self) -> Result<(), Error> {
        if self.0 & Self::RESERVED != 0 {
            Err(Error::ReservedBlockFlags(self.0))
        } else {
            Ok(())
        }
    }
}

impl core::ops::BitOr for BlockControlFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for BlockControlFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl From<u8> for BlockControlFlags {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for BlockControlFlags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

impl cbor::encode::ToCbor for BlockControlFlags {
    fn to_cbor(&self, encoder: &mut cbor::encode::Encoder) {
        encoder.emit(&self.0)
    }
}

impl cbor::decode::FromCbor for BlockControlFlags {
    type Error = cbor::decode::Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        cbor::decode::try_parse::<u8>(data).map(|o| o.map(|(v, len)| (Self(v), len)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_bits() {
        for bits in 0..=0x0F {
            assert!(BlockControlFlags::new(bits).check_valid().is_ok());
        }
        for bit in 4..8 {
            let flags = BlockControlFlags::new((1 << bit) | 0x01);
            assert!(matches!(
                flags.check_valid(),
                Err(Error::ReservedBlockFlags(b)) if b == flags.bits()
            ));
        }
    }

    #[test]
    fn has() {
        let flags = BlockControlFlags::DELETE_BUNDLE | BlockControlFlags::REPLICATE;
        assert!(flags.has(BlockControlFlags::DELETE_BUNDLE));
        assert!(flags.has(BlockControlFlags::REPLICATE));
        assert!(!flags.has(BlockControlFlags::STATUS_REPORT));
        assert!(flags.has(BlockControlFlags::STATUS_REPORT | BlockControlFlags::REPLICATE));
        assert!(!BlockControlFlags::default().has(BlockControlFlags::new(0xFF)));
    }

    #[test]
    fn decode_out_of_range() {
        assert!(cbor::decode::parse::<BlockControlFlags>(&[0x19, 0x01, 0x00]).is_err());
        assert_eq!(
            BlockControlFlags::new(0x0C),
            cbor::decode::parse::<BlockControlFlags>(&[0x0C]).unwrap()
        );
    }
}
