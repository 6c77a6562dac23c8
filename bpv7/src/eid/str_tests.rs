use super::*;

#[test]
fn parse() {
    assert_eq!("dtn:none".parse::<Eid>().unwrap(), Eid::Null);
    assert_eq!(
        "dtn://node/service".parse::<Eid>().unwrap(),
        Eid::Dtn {
            ssp: "//node/service".into()
        }
    );
    assert_eq!(
        "ipn:977.1".parse::<Eid>().unwrap(),
        Eid::Ipn {
            node_number: 977,
            service_number: 1
        }
    );

    assert!(matches!("dtn".parse::<Eid>(), Err(Error::MissingScheme)));
    assert!(matches!(
        "http://example.com".parse::<Eid>(),
        Err(Error::UnsupportedSchemeName(s)) if s == "http"
    ));
    assert!(matches!("ipn:1".parse::<Eid>(), Err(Error::InvalidIpnSsp(_))));
    assert!(matches!("ipn:1.x".parse::<Eid>(), Err(Error::InvalidIpnSsp(_))));
    assert!(matches!("ipn:-1.0".parse::<Eid>(), Err(Error::InvalidIpnSsp(_))));
}

#[test]
fn display() {
    for s in ["dtn:none", "dtn://node/", "dtn:x", "ipn:1.0", "ipn:18446744073709551615.7"] {
        assert_eq!(s.parse::<Eid>().unwrap().to_string(), s);
    }
}

#[test]
fn validity() {
    assert!(Eid::Null.check_valid().is_ok());
    assert!("dtn:x".parse::<Eid>().unwrap().check_valid().is_ok());
    assert!("ipn:1.0".parse::<Eid>().unwrap().check_valid().is_ok());
    assert!(matches!(
        "dtn:".parse::<Eid>().unwrap().check_valid(),
        Err(Error::EmptyDtnSsp)
    ));
    assert!(matches!(
        "ipn:0.1".parse::<Eid>().unwrap().check_valid(),
        Err(Error::IpnInvalidNodeNumber(0))
    ));
}

#[test]
fn serde_string() {
    let eid: Eid = serde_json::from_str("\"ipn:2.3\"").unwrap();
    assert_eq!(
        eid,
        Eid::Ipn {
            node_number: 2,
            service_number: 3
        }
    );
    assert_eq!(serde_json::to_string(&eid).unwrap(), "\"ipn:2.3\"");
    assert!(serde_json::from_str::<Eid>("\"nope\"").is_err());
}
