use drift_bpv7::prelude::*;

/// Parses a bundle, and if it parses, checks that re-encoding it yields a
/// bundle that parses back to the same thing.
pub fn bundle(data: &[u8]) -> bool {
    let Ok(bundle) = Bundle::from_bytes(data) else {
        return false;
    };
    _ = bundle.check_valid();
    _ = bundle.check_crc();

    let Ok(reparsed) = Bundle::from_bytes(&bundle.to_bytes()) else {
        panic!("Re-encoded bundle {} failed to parse", bundle.id());
    };
    assert_eq!(reparsed, bundle, "Re-encoding changed the bundle");
    true
}

pub fn eid_str(data: &[u8]) -> bool {
    std::str::from_utf8(data).is_ok_and(|s| s.parse::<Eid>().is_ok())
}

pub fn eid_cbor(data: &[u8]) -> bool {
    match drift_cbor::decode::parse::<Eid>(data) {
        Ok(eid) => {
            format!("{eid:?} {eid}");
            true
        }
        Err(_) => false,
    }
}
