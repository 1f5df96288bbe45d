/// Current firmware version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Capacity of a full publish topic (prefix + device id)
pub const MAX_TOPIC_LEN: usize = 128;

/// Capacity of a device identifier
pub const MAX_DEVICE_ID_LEN: usize = 32;

/// Interval between idle heartbeat log lines once the configuration is reported
pub const HEARTBEAT_INTERVAL_SECS: u64 = 60;

/// Default location of the configuration file, relative to the crate root
pub const CONFIG_FILE: &str = "cfg.toml";

/// Environment variable overriding [`CONFIG_FILE`]
pub const CONFIG_PATH_ENV: &str = "DEVICE_CONFIG";
