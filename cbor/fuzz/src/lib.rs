use drift_cbor::decode;

/// Decodes and walks one item, returning `true` if it was complete and valid.
pub fn decode(data: &[u8]) -> bool {
    decode::try_parse_value(data, |mut value, _| {
        let s = format!("{value:?}");
        value.skip(16)?;
        Ok::<_, decode::Error>(s)
    })
    .is_ok_and(|r| r.is_some())
}
