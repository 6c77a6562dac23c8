use super::*;
use hex_literal::hex;

#[test]
fn tests() {
    // Positive tests
    assert_eq!(parse(&hex!("82 01 00")), Eid::Null);
    assert_eq!(
        parse(&hex!("82 01 63 78 79 7A")),
        Eid::Dtn { ssp: "xyz".into() }
    );
    assert_eq!(
        parse(&hex!("82 02 82 01 01")),
        Eid::Ipn {
            node_number: 1,
            service_number: 1
        }
    );
    assert_eq!(
        parse(&hex!("82 02 82 1A 000EE868 01")),
        Eid::Ipn {
            node_number: 977000,
            service_number: 1
        }
    );

    // Negative tests
    assert!(matches!(
        expect_error(&[]),
        Error::InvalidCBOR(cbor::decode::Error::NeedMoreData(1))
    ));
    assert!(matches!(
        expect_error(&hex!("82 01 01")),
        Error::InvalidDtnSsp(1)
    ));
    assert!(matches!(
        expect_error(&hex!("82 01 41 00")),
        Error::InvalidField {
            field: "'dtn' scheme-specific part",
            ..
        }
    ));
    assert!(matches!(
        expect_error(&hex!("82 03 00")),
        Error::UnsupportedScheme(3)
    ));
    assert!(matches!(
        expect_error(&hex!("82 02 81 00")),
        Error::InvalidField {
            field: "'ipn' scheme-specific part",
            ..
        }
    ));
    assert!(matches!(
        expect_error(&hex!("82 02 83 00 00 00")),
        Error::InvalidField {
            field: "'ipn' scheme-specific part",
            ..
        }
    ));
    assert!(matches!(
        expect_error(&hex!("83 01 00 00")),
        Error::InvalidCBOR(cbor::decode::Error::AdditionalItems)
    ));
}

#[test]
fn roundtrip() {
    for eid in [
        Eid::Null,
        Eid::Dtn {
            ssp: "//node/svc".into(),
        },
        Eid::Ipn {
            node_number: u64::MAX,
            service_number: 0,
        },
    ] {
        assert_eq!(parse(&cbor::encode::emit(&eid)), eid);
    }
    assert_eq!(
        *cbor::encode::emit(&Eid::Ipn {
            node_number: 1,
            service_number: 2
        }),
        hex!("82 02 82 01 02")
    );
    assert_eq!(*cbor::encode::emit(&Eid::Null), hex!("82 01 00"));
}

fn parse(data: &[u8]) -> Eid {
    cbor::decode::parse::<Eid>(data).expect("Failed to parse")
}

fn expect_error(data: &[u8]) -> Error {
    cbor::decode::parse::<Eid>(data).expect_err("Parsed successfully!")
}
