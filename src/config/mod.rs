//! Device configuration record.
//!
//! The record is loaded from `cfg.toml` by the build script, validated there,
//! and compiled in as [`CONFIG`]. Consumers take a `&Config` and read it
//! through accessors; nothing can mutate it after the build.

pub mod error;
#[cfg(feature = "std")]
pub mod file;
pub mod rules;
pub mod types;

pub use error::{ConfigError, Field};
pub use types::{
    AccessPoint, Board, Fingerprint, FingerprintError, PinCapability, Security, SensorKind,
    TimingProfile,
};

use core::fmt;

use crate::topic::{self, DeviceId, Topic, TopicError};

pub struct Config {
    // MQTT broker hostname or IP address
    broker_address: &'static str,

    // Plaintext MQTT port
    broker_port: u16,

    // TLS MQTT port
    broker_port_secure: u16,

    // MQTT credentials
    username: &'static str,
    password: &'static str,

    // DER client certificate and key on the device filesystem
    cert_file_path: &'static str,
    key_file_path: &'static str,

    // Pinned broker certificate digest
    cert_fingerprint: Fingerprint,

    // Publish topic is this prefix followed by the device id
    topic_prefix: &'static str,

    // Wi-Fi access points, most preferred first
    access_points: &'static [AccessPoint<'static>],

    // External status LED
    led_pin: u8,

    // LED soldered on the board
    onboard_led_pin: u8,

    // Drive the onboard LED instead of the external one
    use_onboard_led: bool,

    // DHT data line
    sensor_pin: u8,

    sensor_type: SensorKind,

    board: Board,
}

impl Config {
    pub const fn broker_address(&self) -> &'static str {
        self.broker_address
    }

    pub const fn broker_port(&self) -> u16 {
        self.broker_port
    }

    pub const fn broker_port_secure(&self) -> u16 {
        self.broker_port_secure
    }

    /// Port of the listener matching `security`.
    pub const fn broker_port_for(&self, security: Security) -> u16 {
        match security {
            Security::Plain => self.broker_port,
            Security::Tls => self.broker_port_secure,
        }
    }

    pub const fn username(&self) -> &'static str {
        self.username
    }

    pub const fn password(&self) -> &'static str {
        self.password
    }

    pub const fn cert_file_path(&self) -> &'static str {
        self.cert_file_path
    }

    pub const fn key_file_path(&self) -> &'static str {
        self.key_file_path
    }

    pub const fn cert_fingerprint(&self) -> &Fingerprint {
        &self.cert_fingerprint
    }

    pub const fn topic_prefix(&self) -> &'static str {
        self.topic_prefix
    }

    pub const fn access_points(&self) -> &'static [AccessPoint<'static>] {
        self.access_points
    }

    /// Always in step with [`Config::access_points`].
    pub const fn access_point_count(&self) -> usize {
        self.access_points.len()
    }

    pub const fn led_pin(&self) -> u8 {
        self.led_pin
    }

    pub const fn onboard_led_pin(&self) -> u8 {
        self.onboard_led_pin
    }

    pub const fn use_onboard_led(&self) -> bool {
        self.use_onboard_led
    }

    /// The LED the firmware should drive.
    pub const fn active_led_pin(&self) -> u8 {
        if self.use_onboard_led {
            self.onboard_led_pin
        } else {
            self.led_pin
        }
    }

    pub const fn sensor_pin(&self) -> u8 {
        self.sensor_pin
    }

    pub const fn sensor_type(&self) -> SensorKind {
        self.sensor_type
    }

    pub const fn board(&self) -> Board {
        self.board
    }

    /// Full publish topic for this device.
    pub fn publish_topic(&self, device_id: &DeviceId) -> Result<Topic, TopicError> {
        topic::publish_topic(self.topic_prefix, device_id)
    }

    /// Re-run the load-time checks. Returns the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        rules::broker_address(self.broker_address)?;
        rules::broker_ports(self.broker_port, self.broker_port_secure)?;
        rules::non_empty(Field::Username, self.username)?;
        rules::non_empty(Field::Password, self.password)?;
        rules::client_credentials(self.cert_file_path, self.key_file_path)?;
        rules::topic_prefix(self.topic_prefix)?;
        rules::access_points(
            self.access_points.iter().map(|ap| (ap.ssid(), ap.password())),
            None,
        )?;
        rules::pins(
            self.board,
            self.led_pin,
            self.onboard_led_pin,
            self.sensor_pin,
        )?;
        Ok(())
    }

    /// Log the record with passwords redacted.
    pub fn log_summary(&self) {
        log::info!(
            "MQTT broker {} (plain {}, tls {}) as {}",
            self.broker_address,
            self.broker_port,
            self.broker_port_secure,
            self.username
        );
        log::info!(
            "Client certificate {}, key {}, broker fingerprint {}",
            self.cert_file_path,
            self.key_file_path,
            self.cert_fingerprint
        );
        log::info!("Topic prefix {:?}", self.topic_prefix);
        for (i, ap) in self.access_points.iter().enumerate() {
            log::info!(
                "Access point {}: {:?} ({})",
                i,
                ap.ssid(),
                if ap.is_open() { "open" } else { "secured" }
            );
        }
        log::info!(
            "{} LED on GPIO{}, {} on GPIO{} ({})",
            if self.use_onboard_led {
                "Onboard"
            } else {
                "External"
            },
            self.active_led_pin(),
            self.sensor_type,
            self.sensor_pin,
            self.board
        );
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("broker_address", &self.broker_address)
            .field("broker_port", &self.broker_port)
            .field("broker_port_secure", &self.broker_port_secure)
            .field("username", &self.username)
            .field("password", &"***")
            .field("cert_file_path", &self.cert_file_path)
            .field("key_file_path", &self.key_file_path)
            .field("cert_fingerprint", &self.cert_fingerprint)
            .field("topic_prefix", &self.topic_prefix)
            .field("access_points", &self.access_points)
            .field("led_pin", &self.led_pin)
            .field("onboard_led_pin", &self.onboard_led_pin)
            .field("use_onboard_led", &self.use_onboard_led)
            .field("sensor_pin", &self.sensor_pin)
            .field("sensor_type", &self.sensor_type)
            .field("board", &self.board)
            .finish()
    }
}

// config values are generated at compile time
include!(concat!(env!("OUT_DIR"), "/config.rs"));

#[cfg(test)]
mod tests {
    use super::*;

    const APS: &[AccessPoint<'static>] = &[
        AccessPoint::new("AP_1", "password_AP1"),
        AccessPoint::new("AP_2", ""),
    ];

    fn sample() -> Config {
        Config {
            broker_address: "mqtt.example.net",
            broker_port: 7906,
            broker_port_secure: 7901,
            username: "MQTT_USER",
            password: "MQTT_PASSWORD",
            cert_file_path: "/client_certificate.crt.der",
            key_file_path: "/client_certificate.key.der",
            cert_fingerprint: Fingerprint::Sha1([0xab; 20]),
            topic_prefix: "mobile/esp_",
            access_points: APS,
            led_pin: 0,
            onboard_led_pin: 2,
            use_onboard_led: true,
            sensor_pin: 4,
            sensor_type: SensorKind::Dht11,
            board: Board::Esp32,
        }
    }

    #[test]
    fn test_generated_config_is_valid() {
        assert_eq!(CONFIG.validate(), Ok(()));
        assert!(CONFIG.access_point_count() >= 1);
        assert_ne!(CONFIG.broker_port(), CONFIG.broker_port_secure());
    }

    #[test]
    fn test_sample_is_valid() {
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn test_access_point_count_is_derived() {
        let config = sample();
        assert_eq!(config.access_point_count(), 2);
        assert_eq!(config.access_points()[0].ssid(), "AP_1");
        assert!(config.access_points()[1].is_open());
    }

    #[test]
    fn test_port_selection() {
        let config = sample();
        assert_eq!(config.broker_port_for(Security::Plain), 7906);
        assert_eq!(config.broker_port_for(Security::Tls), 7901);
    }

    #[test]
    fn test_active_led() {
        let mut config = sample();
        assert_eq!(config.active_led_pin(), 2);
        config.use_onboard_led = false;
        assert_eq!(config.active_led_pin(), 0);
    }

    #[test]
    fn test_validate_reports_field() {
        let mut config = sample();
        config.sensor_pin = 2;
        let err = config.validate().unwrap_err();
        assert_eq!(err.field(), Field::SensorPin);

        let mut config = sample();
        config.username = "";
        assert_eq!(config.validate(), Err(ConfigError::Empty(Field::Username)));

        let mut config = sample();
        config.access_points = &[];
        assert_eq!(config.validate(), Err(ConfigError::NoAccessPoints));
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let debug = format!("{:?}", sample());
        assert!(debug.contains("mqtt.example.net"));
        assert!(!debug.contains("MQTT_PASSWORD"));
        assert!(!debug.contains("password_AP1"));
    }

    #[test]
    fn test_publish_topic() {
        let config = sample();
        let id = DeviceId::from_mac([0x24, 0x0a, 0xc4, 0x12, 0x34, 0x56]);
        let topic = config.publish_topic(&id).unwrap();
        assert_eq!(topic.as_str(), "mobile/esp_123456");
    }
}
