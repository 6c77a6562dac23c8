use drift_cla::stcp::DataUnitCodec;
use tokio_util::{bytes::BytesMut, codec::Decoder};

const MAX_DATA_UNIT: usize = 64 * 1024;

/// Feeds `data` to the STCP framer the way a socket would, in chunks sized by
/// the first byte, returning the number of bundles recovered.
pub fn data_units(data: &[u8]) -> usize {
    let Some((&chunk, data)) = data.split_first() else {
        return 0;
    };
    let mut codec = DataUnitCodec::new(MAX_DATA_UNIT);
    let mut buf = BytesMut::new();
    let mut bundles = 0;
    for piece in data.chunks(usize::from(chunk).max(1)) {
        buf.extend_from_slice(piece);
        loop {
            match codec.decode(&mut buf) {
                Ok(Some(data_unit)) => {
                    if data_unit.to_bundle().is_ok() {
                        bundles += 1;
                    }
                }
                Ok(None) => break,
                Err(_) => return bundles,
            }
        }
    }
    bundles
}
