use super::*;
use error::CaptureFieldErr;

mod error;

pub use error::Error;

#[cfg(test)]
mod str_tests;

#[cfg(test)]
mod cbor_tests;

/// An endpoint identifier.
///
/// `dtn:none` is the null endpoint. `dtn:<ssp>` names an endpoint by an
/// arbitrary non-empty string, `ipn:<node>.<service>` by a pair of numbers.
#[derive(Default, Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub enum Eid {
    #[default]
    Null,
    Dtn {
        ssp: Box<str>,
    },
    Ipn {
        node_number: u64,
        service_number: u64,
    },
}

impl Eid {
    /// Returns `true` if the Eid is the null endpoint `dtn:none`.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Eid::Null)
    }

    /// Checks the structural rules that parsing alone does not enforce.
    pub fn check_valid(&self) -> Result<(), Error> {
        match self {
            Eid::Null => Ok(()),
            Eid::Dtn { ssp } if ssp.is_empty() => Err(Error::EmptyDtnSsp),
            Eid::Dtn { .. } => Ok(()),
            Eid::Ipn { node_number: 0, .. } => Err(Error::IpnInvalidNodeNumber(0)),
            Eid::Ipn { .. } => Ok(()),
        }
    }
}

impl core::str::FromStr for Eid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((scheme, ssp)) = s.split_once(':') else {
            return Err(Error::MissingScheme);
        };
        match scheme {
            "dtn" if ssp == "none" => Ok(Eid::Null),
            "dtn" => Ok(Eid::Dtn { ssp: ssp.into() }),
            "ipn" => {
                let parts = ssp
                    .split_once('.')
                    .and_then(|(n, s)| Some((n.parse().ok()?, s.parse().ok()?)));
                match parts {
                    Some((node_number, service_number)) => Ok(Eid::Ipn {
                        node_number,
                        service_number,
                    }),
                    None => Err(Error::InvalidIpnSsp(ssp.to_string())),
                }
            }
            _ => Err(Error::UnsupportedSchemeName(scheme.to_string())),
        }
    }
}

impl TryFrom<String> for Eid {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Eid> for String {
    fn from(value: Eid) -> Self {
        value.to_string()
    }
}

impl core::fmt::Display for Eid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Eid::Null => f.write_str("dtn:none"),
            Eid::Dtn { ssp } => write!(f, "dtn:{ssp}"),
            Eid::Ipn {
                node_number,
                service_number,
            } => write!(f, "ipn:{node_number}.{service_number}"),
        }
    }
}

impl cbor::encode::ToCbor for Eid {
    fn to_cbor(&self, encoder: &mut cbor::encode::Encoder) {
        match self {
            Eid::Null => encoder.emit(&(1, 0)),
            Eid::Dtn { ssp } => encoder.emit(&(1, &**ssp)),
            Eid::Ipn {
                node_number,
                service_number,
            } => encoder.emit(&(2, &(*node_number, *service_number))),
        }
    }
}

impl cbor::decode::FromCbor for Eid {
    type Error = self::Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        cbor::decode::try_parse_array(data, |a, _| {
            match a.parse::<u64>().map_field_err("EID scheme")? {
                1 => a.parse_value(|value, tags| match value {
                    cbor::decode::Value::UnsignedInteger(0) => Ok(Eid::Null),
                    cbor::decode::Value::UnsignedInteger(v) => Err(Error::InvalidDtnSsp(v)),
                    cbor::decode::Value::Text(ssp) => Ok(Eid::Dtn { ssp: ssp.into() }),
                    cbor::decode::Value::TextStream(chunks) => Ok(Eid::Dtn {
                        ssp: chunks.concat().into(),
                    }),
                    value => Err(cbor::decode::Error::IncorrectType(
                        "Text String or 0".to_string(),
                        value.type_name(!tags.is_empty()),
                    ))
                    .map_field_err("'dtn' scheme-specific part"),
                }),
                2 => a
                    .parse_array(|a, _| {
                        Ok::<_, Error>(Eid::Ipn {
                            node_number: a.parse().map_field_err("ipn node number")?,
                            service_number: a.parse().map_field_err("ipn service number")?,
                        })
                    })
                    .map_field_err("'ipn' scheme-specific part"),
                scheme => Err(Error::UnsupportedScheme(scheme)),
            }
        })
    }
}
