use super::decode::*;
use hex_literal::hex;

#[test]
fn rfc_integers() {
    // RFC 8949, Appendix A:
    // https://www.rfc-editor.org/rfc/rfc8949.html#section-appendix.a

    assert_eq!(0, parse::<u64>(&hex!("00")).unwrap());
    assert_eq!(1, parse::<u64>(&hex!("01")).unwrap());
    assert_eq!(10, parse::<u64>(&hex!("0a")).unwrap());
    assert_eq!(23, parse::<u64>(&hex!("17")).unwrap());
    assert_eq!(24, parse::<u64>(&hex!("1818")).unwrap());
    assert_eq!(25, parse::<u64>(&hex!("1819")).unwrap());
    assert_eq!(100, parse::<u64>(&hex!("1864")).unwrap());
    assert_eq!(1000, parse::<u64>(&hex!("1903e8")).unwrap());
    assert_eq!(1000000, parse::<u64>(&hex!("1a000f4240")).unwrap());
    assert_eq!(
        1000000000000,
        parse::<u64>(&hex!("1b000000e8d4a51000")).unwrap()
    );
    assert_eq!(
        18446744073709551615,
        parse::<u64>(&hex!("1bffffffffffffffff")).unwrap()
    );

    /* We do not support BIGNUMs */
    assert!(parse::<u64>(&hex!("c249010000000000000000")).is_err());
    assert!(parse::<i64>(&hex!("3bffffffffffffffff")).is_err());

    assert_eq!(-1, parse::<i64>(&hex!("20")).unwrap());
    assert_eq!(-10, parse::<i64>(&hex!("29")).unwrap());
    assert_eq!(-100, parse::<i64>(&hex!("3863")).unwrap());
    assert_eq!(-1000, parse::<i64>(&hex!("3903e7")).unwrap());

    assert_eq!(
        Err(Error::IntegerOverflow(256)),
        parse::<u8>(&hex!("190100"))
    );
    assert!(matches!(
        parse::<u64>(&hex!("20")),
        Err(Error::IncorrectType(..))
    ));
}

#[test]
fn rfc_floats() {
    assert_eq!(0.0, parse::<f64>(&hex!("f90000")).unwrap());
    assert_eq!(1.0, parse::<f64>(&hex!("f93c00")).unwrap());
    assert_eq!(1.1, parse::<f64>(&hex!("fb3ff199999999999a")).unwrap());
    assert_eq!(1.5, parse::<f64>(&hex!("f93e00")).unwrap());
    assert_eq!(65504.0, parse::<f64>(&hex!("f97bff")).unwrap());
    assert_eq!(100000.0, parse::<f64>(&hex!("fa47c35000")).unwrap());
    assert_eq!(-4.0, parse::<f64>(&hex!("f9c400")).unwrap());
    assert_eq!(f64::INFINITY, parse::<f64>(&hex!("f97c00")).unwrap());
    assert!(parse::<f64>(&hex!("f97e00")).unwrap().is_nan());
    assert_eq!(f64::NEG_INFINITY, parse::<f64>(&hex!("fbfff0000000000000")).unwrap());
}

#[test]
fn rfc_simple() {
    assert!(!parse::<bool>(&hex!("f4")).unwrap());
    assert!(parse::<bool>(&hex!("f5")).unwrap());
    assert!(
        parse_value(&hex!("f6"), |value, tags| {
            assert!(tags.is_empty());
            Ok::<_, Error>(matches!(value, Value::Null))
        })
        .unwrap()
        .0
    );
    assert!(
        parse_value(&hex!("f7"), |value, _| Ok::<_, Error>(matches!(
            value,
            Value::Undefined
        )))
        .unwrap()
        .0
    );
    assert!(
        parse_value(&hex!("f0"), |value, _| Ok::<_, Error>(matches!(
            value,
            Value::Simple(16)
        )))
        .unwrap()
        .0
    );
    assert_eq!(
        (true, 2),
        parse_value(&hex!("f8ff"), |value, _| Ok::<_, Error>(matches!(
            value,
            Value::Simple(255)
        )))
        .unwrap()
    );
    assert_eq!(
        Err(Error::InvalidSimpleValue(24)),
        parse_value(&hex!("f818"), |_, _| Ok::<_, Error>(()))
    );
}

#[test]
fn rfc_tags() {
    assert_eq!(
        (true, 22),
        parse_value(
            &hex!("c074323031332d30332d32315432303a30343a30305a"),
            |value, tags| match value {
                Value::Text("2013-03-21T20:04:00Z") if tags == vec![0] => Ok::<_, Error>(true),
                _ => Ok(false),
            }
        )
        .unwrap()
    );
    assert_eq!(
        (true, 6),
        parse_value(&hex!("d74401020304"), |value, tags| match value {
            Value::Bytes(v) if v == hex!("01020304") && tags == vec![23] => Ok::<_, Error>(true),
            _ => Ok(false),
        })
        .unwrap()
    );
    assert_eq!(
        Err(Error::NeedMoreData(1)),
        parse_value(&hex!("c1"), |_, _| Ok::<_, Error>(()))
    );
}

#[test]
fn rfc_strings() {
    assert!(parse::<Vec<u8>>(&hex!("40")).unwrap().is_empty());
    assert_eq!(
        hex!("01020304").to_vec(),
        parse::<Vec<u8>>(&hex!("4401020304")).unwrap()
    );
    assert!(parse::<String>(&hex!("60")).unwrap().is_empty());
    assert_eq!("a", &parse::<String>(&hex!("6161")).unwrap());
    assert_eq!("IETF", &parse::<String>(&hex!("6449455446")).unwrap());
    assert_eq!("\"\\", &parse::<String>(&hex!("62225c")).unwrap());
    assert_eq!("\u{00fc}", &parse::<String>(&hex!("62c3bc")).unwrap());
    assert_eq!("\u{6c34}", &parse::<String>(&hex!("63e6b0b4")).unwrap());
    assert_eq!("\u{10151}", &parse::<String>(&hex!("64f0908591")).unwrap());

    assert_eq!(
        hex!("0102030405").to_vec(),
        parse::<Vec<u8>>(&hex!("5f42010243030405ff")).unwrap()
    );
    assert_eq!(
        "streaming",
        &parse::<String>(&hex!("7f657374726561646d696e67ff")).unwrap()
    );
    assert_eq!(
        Err(Error::InvalidChunk),
        parse::<Vec<u8>>(&hex!("5f6161ff"))
    );
    assert!(matches!(
        parse::<String>(&hex!("62c328")),
        Err(Error::InvalidUtf8(_))
    ));
}

#[test]
fn rfc_arrays() {
    assert_eq!(
        (0, 1),
        parse_array(&hex!("80"), |a, tags| {
            assert!(tags.is_empty());
            assert!(a.end().unwrap());
            Ok::<_, Error>(a.len().unwrap())
        })
        .unwrap()
    );
    assert_eq!(
        (vec![1, 2, 3], 4),
        parse_array(&hex!("83010203"), |a, _| {
            assert_eq!(Some(3), a.len());
            let v: Vec<u64> = vec![a.parse()?, a.parse()?, a.parse()?];
            assert!(a.end()?);
            Ok::<_, Error>(v)
        })
        .unwrap()
    );
    assert_eq!(
        (8, 8),
        parse_array(&hex!("8301820203820405"), |a, _| {
            assert_eq!(1, a.parse::<u64>()?);
            assert_eq!(
                (2, 3),
                a.parse_array(|a, _| Ok::<_, Error>((a.parse::<u64>()?, a.parse::<u64>()?)))?
            );
            assert_eq!(
                (4, 5),
                a.parse_array(|a, _| Ok::<_, Error>((a.parse::<u64>()?, a.parse::<u64>()?)))?
            );
            Ok::<_, Error>(a.offset())
        })
        .unwrap()
    );

    // Indefinite-length forms
    assert_eq!(
        (vec![1, 2, 3], 5),
        parse_array(&hex!("9f010203ff"), |a, _| {
            assert!(!a.is_definite());
            let mut v = Vec::new();
            while let Some(n) = a.try_parse::<u64>()? {
                v.push(n);
            }
            Ok::<_, Error>(v)
        })
        .unwrap()
    );
    assert_eq!(
        (25, 29),
        parse_array(
            &hex!("9f0102030405060708090a0b0c0d0e0f101112131415161718181819ff"),
            |a, _| {
                let mut count = 0;
                while a.skip_value(16)? {
                    count += 1;
                }
                Ok::<_, Error>(count)
            }
        )
        .unwrap()
    );
}

#[test]
fn rfc_maps() {
    assert_eq!(
        (vec![(1, 2), (3, 4)], 5),
        parse_value(&hex!("a201020304"), |value, _| match value {
            Value::Map(m) => {
                assert_eq!(Some(2), m.len());
                let mut v = Vec::new();
                while let Some(k) = m.try_parse::<u64>()? {
                    v.push((k, m.parse::<u64>()?));
                }
                Ok::<_, Error>(v)
            }
            value => Err(Error::IncorrectType("Map".into(), value.type_name(false))),
        })
        .unwrap()
    );
    assert_eq!(
        Err(Error::PartialMap),
        parse_value(&hex!("bf6161ff"), |mut value, _| value.skip(16))
    );
}

#[test]
fn truncated() {
    assert_eq!(Ok(None), try_parse::<u64>(&[]));
    assert_eq!(Err(Error::NeedMoreData(1)), parse::<u64>(&hex!("1903")));
    assert_eq!(Err(Error::NeedMoreData(3)), parse::<Vec<u8>>(&hex!("4401")));
    assert_eq!(
        Err(Error::NeedMoreData(1)),
        parse_array(&hex!("83010203")[..3], |a, _| {
            a.skip_to_end(16)?;
            Ok::<_, Error>(())
        })
    );
    assert_eq!(
        Err(Error::NeedMoreData(1)),
        parse_array(&hex!("9f0102"), |a, _| {
            a.skip_to_end(16)?;
            Ok::<_, Error>(())
        })
    );
}

#[test]
fn malformed() {
    assert_eq!(Err(Error::InvalidMinorValue(28)), parse::<u64>(&hex!("1c")));
    assert_eq!(
        Err(Error::UnexpectedBreak),
        parse_value(&hex!("ff"), |_, _| Ok::<_, Error>(()))
    );
    assert_eq!(
        Err(Error::AdditionalItems),
        parse_array(&hex!("820102"), |a, _| a.parse::<u64>())
    );
    assert_eq!(
        Err(Error::NotEnoughData),
        parse_array(&hex!("8101"), |a, _| {
            a.parse::<u64>()?;
            a.parse::<u64>()
        })
    );
    assert_eq!(
        Err(Error::MaxRecursion),
        parse_value(&hex!("818181818101"), |mut value, _| value.skip(3))
    );
    assert_eq!(
        Err(Error::LengthOverflow(u64::MAX)),
        parse::<Vec<u8>>(&hex!("5bffffffffffffffff"))
    );
}

#[derive(Debug, PartialEq)]
struct Even(u64);

#[derive(Debug, PartialEq)]
enum EvenError {
    Odd(u64),
    Cbor(Error),
}

impl From<Error> for EvenError {
    fn from(e: Error) -> Self {
        EvenError::Cbor(e)
    }
}

impl FromCbor for Even {
    type Error = EvenError;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        match u64::try_from_cbor(data)? {
            Some((v, len)) if v % 2 == 0 => Ok(Some((Even(v), len))),
            Some((v, _)) => Err(EvenError::Odd(v)),
            None => Ok(None),
        }
    }
}

#[test]
fn sequence_parse_past_end() {
    // Definite: the third item is asked for but there are only two
    assert_eq!(
        Err(EvenError::Cbor(Error::NotEnoughData)),
        parse_array(&hex!("820204"), |a, _| {
            assert_eq!(Even(2), a.parse::<Even>()?);
            assert_eq!(Even(4), a.parse::<Even>()?);
            a.parse::<Even>()
        })
        .map(|(v, _)| v)
    );

    // Indefinite: the break ends the sequence
    assert_eq!(
        Err(EvenError::Cbor(Error::NotEnoughData)),
        parse_array(&hex!("9f06ff"), |a, _| {
            assert_eq!(Even(6), a.parse::<Even>()?);
            a.parse::<Even>()
        })
        .map(|(v, _)| v)
    );

    // The item's own error passes through untouched
    assert_eq!(
        Err(EvenError::Odd(3)),
        parse_array(&hex!("8103"), |a, _| a.parse::<Even>()).map(|(v, _)| v)
    );
}
