use drift_bpv7::eid::Eid;
use serde::Deserialize;
use std::path::PathBuf;

fn default_start_attempts() -> u32 {
    5
}

fn default_retry_interval_ms() -> u64 {
    5000
}

#[derive(Debug, Deserialize)]
pub struct Config {
    /// The endpoint ID of this node, e.g. ipn:1.0
    pub node_id: Eid,

    /// STCP listeners to start
    #[serde(default)]
    pub listeners: Vec<drift_cla::stcp::config::Config>,

    /// How many times to try starting a listener whose address is busy
    #[serde(default = "default_start_attempts")]
    pub start_attempts: u32,

    /// Milliseconds to wait between start attempts
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,
}

pub fn load(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    } else {
        // Optional default config file in current directory
        builder = builder.add_source(
            config::File::from(std::path::Path::new("drift-stcp.toml")).required(false),
        );
    }

    // Allow environment variables to override
    builder = builder.add_source(config::Environment::with_prefix("DRIFT_STCP"));

    builder.build()?.try_deserialize().map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn config_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    #[serial]
    fn toml_file() {
        let file = config_file(
            ".toml",
            r#"
node_id = "ipn:1.0"
start_attempts = 2

[[listeners]]
address = "127.0.0.1:4556"
permanent = true

[[listeners]]
address = "[::1]:4557"
channel_capacity = 64
"#,
        );

        let config = load(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(
            config.node_id,
            Eid::Ipn {
                node_number: 1,
                service_number: 0
            }
        );
        assert_eq!(config.start_attempts, 2);
        assert_eq!(config.retry_interval_ms, 5000);
        assert_eq!(config.listeners.len(), 2);
        assert_eq!(config.listeners[0].address, "127.0.0.1:4556");
        assert!(config.listeners[0].permanent);
        assert_eq!(config.listeners[0].channel_capacity, 16);
        assert!(!config.listeners[1].permanent);
        assert_eq!(config.listeners[1].channel_capacity, 64);
    }

    #[test]
    #[serial]
    fn yaml_file() {
        let file = config_file(
            ".yaml",
            "node_id: dtn:node\nlisteners:\n  - address: localhost:4556\n",
        );

        let config = load(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.node_id.to_string(), "dtn:node");
        assert_eq!(config.listeners[0].address, "localhost:4556");
    }

    #[test]
    #[serial]
    fn environment_override() {
        let file = config_file(".toml", "node_id = \"ipn:1.0\"\n");

        // SAFETY: tests touching the environment are serialised
        unsafe { std::env::set_var("DRIFT_STCP_NODE_ID", "ipn:9.0") };
        let config = load(Some(file.path().to_path_buf()));
        unsafe { std::env::remove_var("DRIFT_STCP_NODE_ID") };

        assert_eq!(config.unwrap().node_id.to_string(), "ipn:9.0");
    }

    #[test]
    #[serial]
    fn invalid_node_id() {
        let file = config_file(".toml", "node_id = \"nonsense\"\n");
        assert!(load(Some(file.path().to_path_buf())).is_err());
    }

    #[test]
    #[serial]
    fn missing_file() {
        assert!(load(Some(PathBuf::from("/nonexistent/drift-stcp.toml"))).is_err());
    }
}
