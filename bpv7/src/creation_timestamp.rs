use super::*;
use error::CaptureFieldErr;

/// The creation time and sequence number that, with the source, identify a bundle.
///
/// A creation time of zero on the wire means the source has no accurate clock
/// and is represented as `None`.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreationTimestamp {
    pub creation_time: Option<DtnTime>,
    pub sequence_number: u64,
}

impl CreationTimestamp {
    pub fn now() -> Self {
        let timestamp = time::OffsetDateTime::now_utc();
        Self::new(
            timestamp.try_into().ok(),
            (timestamp.nanosecond() % 1_000_000) as u64,
        )
    }

    /// A creation time of exactly the DTN epoch is indistinguishable from no
    /// clock on the wire, so it is stored as `None`.
    pub fn new(creation_time: Option<DtnTime>, sequence_number: u64) -> Self {
        Self {
            creation_time: creation_time.filter(|t| t.millisecs() != 0),
            sequence_number,
        }
    }
}

impl core::fmt::Display for CreationTimestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.creation_time {
            Some(t) => write!(f, "{t} #{}", self.sequence_number),
            None => write!(f, "no clock #{}", self.sequence_number),
        }
    }
}

impl cbor::encode::ToCbor for CreationTimestamp {
    fn to_cbor(&self, encoder: &mut cbor::encode::Encoder) {
        encoder.emit(&(
            self.creation_time.map_or(0, |t| t.millisecs()),
            self.sequence_number,
        ))
    }
}

impl cbor::decode::FromCbor for CreationTimestamp {
    type Error = Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        cbor::decode::try_parse_array(data, |a, _| {
            let timestamp = a.parse::<u64>().map_field_err("bundle creation time")?;
            Ok(CreationTimestamp {
                creation_time: (timestamp != 0).then(|| DtnTime::new(timestamp)),
                sequence_number: a.parse().map_field_err("sequence number")?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn epoch_is_no_clock() {
        let ts = CreationTimestamp::new(Some(DtnTime::new(0)), 7);
        assert_eq!(ts.creation_time, None);
        assert_eq!(ts.to_string(), "no clock #7");

        let data = cbor::encode::emit(&ts);
        assert_eq!(data, hex!("82 00 07"));
        assert_eq!(cbor::decode::parse::<CreationTimestamp>(&data).unwrap(), ts);
    }

    #[test]
    fn with_clock() {
        let ts = CreationTimestamp::new(Some(DtnTime::new(1500)), 1);
        let data = cbor::encode::emit(&ts);
        assert_eq!(data, hex!("82 19 05dc 01"));
        assert_eq!(cbor::decode::parse::<CreationTimestamp>(&data).unwrap(), ts);
    }
}
