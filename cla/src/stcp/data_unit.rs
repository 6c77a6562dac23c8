use super::*;

/// One framed bundle on an STCP connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUnit {
    pub length: u64,
    pub data: Box<[u8]>,
}

impl DataUnit {
    pub fn new(bundle: &Bundle) -> Self {
        let data: Box<[u8]> = bundle.to_bytes().into();
        Self {
            length: data.len() as u64,
            data,
        }
    }

    /// Decodes the carried bundle.
    pub fn to_bundle(&self) -> Result<Bundle> {
        if self.length != self.data.len() as u64 {
            return Err(Error::LengthMismatch {
                declared: self.length,
                actual: self.data.len(),
            });
        }
        Bundle::from_bytes(&self.data).map_err(Into::into)
    }
}

impl cbor::encode::ToCbor for DataUnit {
    fn to_cbor(&self, encoder: &mut cbor::encode::Encoder) {
        encoder.emit_array(Some(2), |a| {
            a.emit(&self.length);
            a.emit(&cbor::encode::Bytes(&self.data));
        })
    }
}

impl cbor::decode::FromCbor for DataUnit {
    type Error = cbor::decode::Error;

    fn try_from_cbor(data: &[u8]) -> core::result::Result<Option<(Self, usize)>, Self::Error> {
        cbor::decode::try_parse_array(data, |a, _| {
            if a.len().is_some_and(|len| len != 2) {
                return Err(cbor::decode::Error::AdditionalItems);
            }
            Ok(DataUnit {
                length: a.parse()?,
                data: a.parse()?,
            })
        })
    }
}
