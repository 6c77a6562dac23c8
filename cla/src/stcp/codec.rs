use super::*;
use tokio_util::bytes::{Buf, BufMut, BytesMut};

pub(super) const DEFAULT_MAX_DATA_UNIT: usize = 16 * 1024 * 1024;

/// Frames a byte stream into [`DataUnit`]s.
///
/// Data units are self-delimiting CBOR, so a partial unit is simply left in
/// the buffer until more bytes arrive.
#[derive(Debug, Clone)]
pub struct DataUnitCodec {
    max_length: usize,
}

impl DataUnitCodec {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl Default for DataUnitCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DATA_UNIT)
    }
}

impl tokio_util::codec::Decoder for DataUnitCodec {
    type Item = DataUnit;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        match cbor::decode::try_parse::<DataUnit>(src) {
            Ok(Some((data_unit, len))) => {
                src.advance(len);
                Ok(Some(data_unit))
            }
            // Not enough data to read the header
            Ok(None) => Ok(None),
            Err(cbor::decode::Error::NeedMoreData(n)) => {
                let needed = src.len().saturating_add(n);
                if needed > self.max_length {
                    return Err(Error::DataUnitTooLarge(needed));
                }
                src.reserve(n);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl tokio_util::codec::Encoder<DataUnit> for DataUnitCodec {
    type Error = Error;

    fn encode(&mut self, item: DataUnit, dst: &mut BytesMut) -> Result<()> {
        let data = cbor::encode::emit(&item);
        if data.len() > self.max_length {
            return Err(Error::DataUnitTooLarge(data.len()));
        }
        dst.put_slice(&data);
        Ok(())
    }
}
