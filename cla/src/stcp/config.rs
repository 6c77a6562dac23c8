#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    // The host:port to listen for STCP connections
    pub address: String, // default [::]:4556

    // Whether the listener should be kept after failures
    pub permanent: bool,

    // Number of received bundles buffered before connections are back-pressured
    pub channel_capacity: usize, // default 16

    // Largest allowable data unit, in bytes
    pub max_data_unit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: "[::]:4556".to_string(),
            permanent: false,
            channel_capacity: 16,
            max_data_unit: super::codec::DEFAULT_MAX_DATA_UNIT,
        }
    }
}

impl Config {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }
}
