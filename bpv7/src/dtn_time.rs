use super::*;

const DTN_EPOCH: time::OffsetDateTime = time::macros::datetime!(2000-01-01 00:00:00 UTC);

/// Milliseconds since the DTN epoch, 2000-01-01 00:00:00 UTC.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DtnTime {
    millisecs: u64,
}

impl DtnTime {
    pub fn now() -> Self {
        Self {
            millisecs: (time::OffsetDateTime::now_utc() - DTN_EPOCH)
                .whole_milliseconds()
                .clamp(0, u64::MAX as i128) as u64,
        }
    }

    pub fn new(millisecs: u64) -> Self {
        Self { millisecs }
    }

    pub fn millisecs(&self) -> u64 {
        self.millisecs
    }
}

impl core::fmt::Display for DtnTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let instant: time::OffsetDateTime = (*self).into();
        match instant.format(&time::format_description::well_known::Rfc3339) {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{}ms", self.millisecs),
        }
    }
}

impl cbor::encode::ToCbor for DtnTime {
    fn to_cbor(&self, encoder: &mut cbor::encode::Encoder) {
        encoder.emit(&self.millisecs)
    }
}

impl cbor::decode::FromCbor for DtnTime {
    type Error = cbor::decode::Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        cbor::decode::try_parse::<u64>(data).map(|o| o.map(|(millisecs, len)| (Self { millisecs }, len)))
    }
}

impl TryFrom<time::OffsetDateTime> for DtnTime {
    type Error = time::error::ConversionRange;

    fn try_from(instant: time::OffsetDateTime) -> Result<Self, Self::Error> {
        let millisecs = (instant - DTN_EPOCH).whole_milliseconds();
        if millisecs < 0 || millisecs > u64::MAX as i128 {
            Err(time::error::ConversionRange)
        } else {
            Ok(Self {
                millisecs: millisecs as u64,
            })
        }
    }
}

impl From<DtnTime> for time::OffsetDateTime {
    fn from(dtn_time: DtnTime) -> Self {
        DTN_EPOCH.saturating_add(time::Duration::milliseconds(
            i64::try_from(dtn_time.millisecs).unwrap_or(i64::MAX),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch() {
        let t = DtnTime::try_from(time::macros::datetime!(2000-01-01 00:00:01.5 UTC)).unwrap();
        assert_eq!(t.millisecs(), 1500);
        assert_eq!(
            time::OffsetDateTime::from(t),
            time::macros::datetime!(2000-01-01 00:00:01.5 UTC)
        );
        assert!(DtnTime::try_from(time::macros::datetime!(1999-12-31 23:59:59 UTC)).is_err());
        assert_eq!(DtnTime::new(0).to_string(), "2000-01-01T00:00:00Z");
    }
}
