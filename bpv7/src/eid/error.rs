use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing scheme separator ':'")]
    MissingScheme,

    #[error("Unsupported EID scheme '{0}'")]
    UnsupportedSchemeName(String),

    #[error("Unsupported EID scheme {0}")]
    UnsupportedScheme(u64),

    #[error("Invalid 'ipn' scheme-specific part '{0}'")]
    InvalidIpnSsp(String),

    #[error("Invalid 'dtn' scheme-specific part {0}")]
    InvalidDtnSsp(u64),

    #[error("Empty 'dtn' scheme-specific part")]
    EmptyDtnSsp,

    #[error("Invalid ipn node number {0}")]
    IpnInvalidNodeNumber(u64),

    #[error("Failed to parse {field}: {source}")]
    InvalidField {
        field: &'static str,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    InvalidCBOR(#[from] drift_cbor::decode::Error),
}

pub trait CaptureFieldErr<T> {
    fn map_field_err(self, field: &'static str) -> Result<T, Error>;
}

impl<T, E: Into<Box<dyn std::error::Error + Send + Sync>>> CaptureFieldErr<T>
    for std::result::Result<T, E>
{
    fn map_field_err(self, field: &'static str) -> Result<T, Error> {
        self.map_err(|e| Error::InvalidField {
            field,
            source: e.into(),
        })
    }
}
