use super::*;

/// The bundle processing control flags carried in the primary block.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BundleControlFlags(u64);

impl BundleControlFlags {
    pub const IS_FRAGMENT: Self = Self(1 << 0);
    pub const ADMINISTRATIVE_RECORD: Self = Self(1 << 1);
    pub const MUST_NOT_FRAGMENT: Self = Self(1 << 2);
    pub const APP_ACK_REQUESTED: Self = Self(1 << 5);
    pub const STATUS_TIME_REQUESTED: Self = Self(1 << 6);
    pub const RECEPTION_REPORT: Self = Self(1 << 14);
    pub const FORWARDING_REPORT: Self = Self(1 << 16);
    pub const DELIVERY_REPORT: Self = Self(1 << 17);
    pub const DELETION_REPORT: Self = Self(1 << 18);

    /// Any of the status report request flags.
    pub const STATUS_REPORTS: Self = Self(
        Self::RECEPTION_REPORT.0
            | Self::FORWARDING_REPORT.0
            | Self::DELIVERY_REPORT.0
            | Self::DELETION_REPORT.0,
    );

    const DEFINED: u64 = Self::IS_FRAGMENT.0
        | Self::ADMINISTRATIVE_RECORD.0
        | Self::MUST_NOT_FRAGMENT.0
        | Self::APP_ACK_REQUESTED.0
        | Self::STATUS_TIME_REQUESTED.0
        | Self::STATUS_REPORTS.0;

    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// Returns `true` if any bit of `mask` is set.
    pub fn has(&self, mask: Self) -> bool {
        self.0 & mask.0 != 0
    }

    pub fn check_valid(&self) -> Result<(), Error> {
        if self.0 & !Self::DEFINED != 0 {
            Err(Error::ReservedBundleFlags(self.0))
        } else {
            Ok(())
        }
    }
}

impl core::ops::BitOr for BundleControlFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for BundleControlFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl core::fmt::Display for BundleControlFlags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl cbor::encode::ToCbor for BundleControlFlags {
    fn to_cbor(&self, encoder: &mut cbor::encode::Encoder) {
        encoder.emit(&self.0)
    }
}

impl cbor::decode::FromCbor for BundleControlFlags {
    type Error = cbor::decode::Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        cbor::decode::try_parse::<u64>(data).map(|o| o.map(|(v, len)| (Self(v), len)))
    }
}
