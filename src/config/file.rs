//! `cfg.toml` loading.
//!
//! [`RawConfig`] mirrors the file one key per field and round-trips through
//! TOML unchanged. [`RawConfig::resolve`] turns it into validated
//! [`Settings`], fetching secrets through a [`SecretProvider`] on the way.
//! The build script renders `Settings` into the `CONFIG` constant.
//!
//! ```toml
//! broker_address = "mqtt.example.net"
//! password = { env = "MQTT_PASSWORD" }
//!
//! [[access_points]]
//! ssid = "AP_1"
//! password = "password_AP1"
//! ```

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use super::error::{ConfigError, Field};
use super::rules;
use super::types::{Board, Fingerprint, SensorKind};
use crate::constants::{CONFIG_FILE, CONFIG_PATH_ENV};

/// Where a secret value comes from.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecretSource {
    /// Written in the file.
    Literal(String),
    /// Looked up by name, e.g. `{ env = "MQTT_PASSWORD" }`.
    Env { env: String },
}

impl SecretSource {
    fn env_name(&self) -> Option<&str> {
        match self {
            Self::Literal(_) => None,
            Self::Env { env } => Some(env.as_str()),
        }
    }
}

impl Drop for SecretSource {
    fn drop(&mut self) {
        if let Self::Literal(value) = self {
            value.zeroize();
        }
    }
}

impl fmt::Debug for SecretSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(_) => f.write_str("Literal(***)"),
            Self::Env { env } => f.debug_struct("Env").field("env", env).finish(),
        }
    }
}

impl From<&str> for SecretSource {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

/// A resolved secret. Wiped on drop, never printed.
#[derive(Clone)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for Secret {}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Source of secrets referenced by name from the config file.
pub trait SecretProvider {
    fn secret(&self, name: &str) -> Option<String>;
}

/// Reads secrets from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl SecretProvider for EnvSecrets {
    fn secret(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

impl SecretProvider for BTreeMap<String, String> {
    fn secret(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl SecretProvider for HashMap<String, String> {
    fn secret(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

#[derive(Debug)]
pub enum LoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Not TOML, wrong value type, or unknown key.
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    /// Secret indirection names a variable the provider does not have.
    SecretUnavailable { field: Field, name: String },
    Invalid(ConfigError),
}

impl LoadError {
    /// Field to blame, when the error can be pinned to one.
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::SecretUnavailable { field, .. } => Some(*field),
            Self::Invalid(e) => Some(e.field()),
            _ => None,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {}", path.display(), source),
            Self::Parse(e) => write!(f, "malformed configuration: {}", e),
            Self::Serialize(e) => write!(f, "cannot serialize configuration: {}", e),
            Self::SecretUnavailable { field, name } => {
                write!(f, "{}: secret {:?} is not available", field, name)
            }
            Self::Invalid(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::Serialize(e) => Some(e),
            Self::SecretUnavailable { .. } => None,
            Self::Invalid(e) => Some(e),
        }
    }
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        Self::Invalid(e)
    }
}

impl From<toml::de::Error> for LoadError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

/// Config file location: `$DEVICE_CONFIG`, else `cfg.toml` under `root`.
pub fn config_path(root: &Path) -> PathBuf {
    match env::var_os(CONFIG_PATH_ENV) {
        Some(path) => root.join(path),
        None => root.join(CONFIG_FILE),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAccessPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,
    /// `""` for an open network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<SecretSource>,
}

/// `cfg.toml` as written. Every field is optional here so a missing key is
/// reported as [`ConfigError::Missing`] naming it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_port_secure: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<SecretSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_fingerprint: Option<SecretSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_prefix: Option<String>,
    /// Redundant with `access_points`; checked when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_point_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub led_pin: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboard_led_pin: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_onboard_led: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_pin: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_type: Option<String>,
    /// Defaults to `esp32`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
    // Tables last
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access_points: Vec<RawAccessPoint>,
}

fn require<T: Clone>(value: &Option<T>, field: Field) -> Result<T, ConfigError> {
    value.clone().ok_or(ConfigError::Missing(field))
}

fn resolve_secret(
    source: &SecretSource,
    field: Field,
    secrets: &dyn SecretProvider,
) -> Result<Secret, LoadError> {
    match source {
        SecretSource::Literal(value) => Ok(Secret::new(value.as_str())),
        SecretSource::Env { env } => {
            secrets
                .secret(env)
                .map(Secret::new)
                .ok_or_else(|| LoadError::SecretUnavailable {
                    field,
                    name: env.clone(),
                })
        }
    }
}

impl RawConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, LoadError> {
        toml::to_string(self).map_err(LoadError::Serialize)
    }

    /// Environment variables this file reads secrets from.
    pub fn secret_names(&self) -> Vec<&str> {
        self.password
            .iter()
            .chain(self.cert_fingerprint.iter())
            .chain(self.access_points.iter().filter_map(|ap| ap.password.as_ref()))
            .filter_map(SecretSource::env_name)
            .collect()
    }

    /// Check presence, fetch secrets, parse typed fields, then validate.
    pub fn resolve(&self, secrets: &dyn SecretProvider) -> Result<Settings, LoadError> {
        let broker_address = require(&self.broker_address, Field::BrokerAddress)?;
        let broker_port = require(&self.broker_port, Field::BrokerPort)?;
        let broker_port_secure = require(&self.broker_port_secure, Field::BrokerPortSecure)?;
        let username = require(&self.username, Field::Username)?;
        let password = require(&self.password, Field::Password)?;
        let cert_file_path = require(&self.cert_file_path, Field::CertFilePath)?;
        let key_file_path = require(&self.key_file_path, Field::KeyFilePath)?;
        let cert_fingerprint = require(&self.cert_fingerprint, Field::CertFingerprint)?;
        let topic_prefix = require(&self.topic_prefix, Field::TopicPrefix)?;
        let led_pin = require(&self.led_pin, Field::LedPin)?;
        let onboard_led_pin = require(&self.onboard_led_pin, Field::OnboardLedPin)?;
        let use_onboard_led = require(&self.use_onboard_led, Field::UseOnboardLed)?;
        let sensor_pin = require(&self.sensor_pin, Field::SensorPin)?;
        let sensor_type: SensorKind = require(&self.sensor_type, Field::SensorType)?.parse()?;
        let board = match &self.board {
            Some(board) => board.parse::<Board>()?,
            None => Board::default(),
        };

        let mut access_points = Vec::with_capacity(self.access_points.len());
        for (index, ap) in self.access_points.iter().enumerate() {
            let ssid = ap.ssid.clone().ok_or(ConfigError::InvalidSsid {
                index,
                reason: "missing",
            })?;
            let password = ap.password.as_ref().ok_or(ConfigError::InvalidPassphrase {
                index,
                reason: "missing (use \"\" for an open network)",
            })?;
            access_points.push(WifiCredentials {
                ssid,
                password: resolve_secret(password, Field::AccessPoints, secrets)?,
            });
        }

        let fingerprint = resolve_secret(&cert_fingerprint, Field::CertFingerprint, secrets)?;

        let settings = Settings {
            broker_address,
            broker_port,
            broker_port_secure,
            username,
            password: resolve_secret(&password, Field::Password, secrets)?,
            cert_file_path,
            key_file_path,
            cert_fingerprint: rules::fingerprint(fingerprint.expose())?,
            topic_prefix,
            access_points,
            led_pin,
            onboard_led_pin,
            use_onboard_led,
            sensor_pin,
            sensor_type,
            board,
        };
        settings.check(self.access_point_count)?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    ssid: String,
    password: Secret,
}

impl WifiCredentials {
    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &Secret {
        &self.password
    }
}

/// Validated configuration with secrets resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    broker_address: String,
    broker_port: u16,
    broker_port_secure: u16,
    username: String,
    password: Secret,
    cert_file_path: String,
    key_file_path: String,
    cert_fingerprint: Fingerprint,
    topic_prefix: String,
    access_points: Vec<WifiCredentials>,
    led_pin: u8,
    onboard_led_pin: u8,
    use_onboard_led: bool,
    sensor_pin: u8,
    sensor_type: SensorKind,
    board: Board,
}

impl Settings {
    /// Load, resolve and validate in one step.
    pub fn load(path: &Path, secrets: &dyn SecretProvider) -> Result<Self, LoadError> {
        RawConfig::load(path)?.resolve(secrets)
    }

    fn check(&self, declared_access_points: Option<usize>) -> Result<(), ConfigError> {
        rules::broker_address(&self.broker_address)?;
        rules::broker_ports(self.broker_port, self.broker_port_secure)?;
        rules::non_empty(Field::Username, &self.username)?;
        rules::non_empty(Field::Password, self.password.expose())?;
        rules::client_credentials(&self.cert_file_path, &self.key_file_path)?;
        rules::topic_prefix(&self.topic_prefix)?;
        rules::access_points(
            self.access_points
                .iter()
                .map(|ap| (ap.ssid.as_str(), ap.password.expose())),
            declared_access_points,
        )?;
        rules::pins(
            self.board,
            self.led_pin,
            self.onboard_led_pin,
            self.sensor_pin,
        )?;
        Ok(())
    }

    pub fn broker_address(&self) -> &str {
        &self.broker_address
    }

    pub fn topic_prefix(&self) -> &str {
        &self.topic_prefix
    }

    pub fn access_points(&self) -> &[WifiCredentials] {
        &self.access_points
    }

    pub fn access_point_count(&self) -> usize {
        self.access_points.len()
    }

    pub fn cert_fingerprint(&self) -> &Fingerprint {
        &self.cert_fingerprint
    }

    pub fn sensor_type(&self) -> SensorKind {
        self.sensor_type
    }

    pub fn board(&self) -> Board {
        self.board
    }

    /// File form with every secret written out literally.
    pub fn to_raw(&self) -> RawConfig {
        RawConfig {
            broker_address: Some(self.broker_address.clone()),
            broker_port: Some(self.broker_port),
            broker_port_secure: Some(self.broker_port_secure),
            username: Some(self.username.clone()),
            password: Some(self.password.expose().into()),
            cert_file_path: Some(self.cert_file_path.clone()),
            key_file_path: Some(self.key_file_path.clone()),
            cert_fingerprint: Some(self.cert_fingerprint.to_string().as_str().into()),
            topic_prefix: Some(self.topic_prefix.clone()),
            access_point_count: None,
            led_pin: Some(self.led_pin),
            onboard_led_pin: Some(self.onboard_led_pin),
            use_onboard_led: Some(self.use_onboard_led),
            sensor_pin: Some(self.sensor_pin),
            sensor_type: Some(self.sensor_type.as_str().to_string()),
            board: Some(self.board.as_str().to_string()),
            access_points: self
                .access_points
                .iter()
                .map(|ap| RawAccessPoint {
                    ssid: Some(ap.ssid.clone()),
                    password: Some(ap.password.expose().into()),
                })
                .collect(),
        }
    }

    /// Rust source defining `pub const CONFIG: Config`, to be `include!`d
    /// from the `config` module.
    pub fn to_rust_const(&self) -> String {
        let fingerprint = match self.cert_fingerprint {
            Fingerprint::Sha1(_) => "Sha1",
            Fingerprint::Sha256(_) => "Sha256",
        };
        let fingerprint_bytes = self
            .cert_fingerprint
            .as_bytes()
            .iter()
            .map(|b| format!("{:#04x}", b))
            .collect::<Vec<_>>()
            .join(", ");

        let mut access_points = String::new();
        for ap in &self.access_points {
            // writing to a String cannot fail
            let _ = writeln!(
                access_points,
                "                AccessPoint::new({:?}, {:?}),",
                ap.ssid,
                ap.password.expose()
            );
        }

        format!(
            r#"
        pub const CONFIG: Config = Config {{
            broker_address: {broker_address:?},
            broker_port: {broker_port},
            broker_port_secure: {broker_port_secure},
            username: {username:?},
            password: {password:?},
            cert_file_path: {cert_file_path:?},
            key_file_path: {key_file_path:?},
            cert_fingerprint: Fingerprint::{fingerprint}([{fingerprint_bytes}]),
            topic_prefix: {topic_prefix:?},
            access_points: &[
{access_points}            ],
            led_pin: {led_pin},
            onboard_led_pin: {onboard_led_pin},
            use_onboard_led: {use_onboard_led},
            sensor_pin: {sensor_pin},
            sensor_type: SensorKind::{sensor_type:?},
            board: Board::{board:?},
        }};
    "#,
            broker_address = self.broker_address,
            broker_port = self.broker_port,
            broker_port_secure = self.broker_port_secure,
            username = self.username,
            password = self.password.expose(),
            cert_file_path = self.cert_file_path,
            key_file_path = self.key_file_path,
            topic_prefix = self.topic_prefix,
            led_pin = self.led_pin,
            onboard_led_pin = self.onboard_led_pin,
            use_onboard_led = self.use_onboard_led,
            sensor_pin = self.sensor_pin,
            sensor_type = self.sensor_type,
            board = self.board,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FINGERPRINT: &str = "AA:BB:CC:DD:EE:FF:00:11:22:33:44:55:66:77:88:99:AA:BB:CC:DD";

    fn sample_toml() -> String {
        format!(
            r#"
broker_address = "mqtt.example.net"
broker_port = 7906
broker_port_secure = 7901
username = "MQTT_USER"
password = "MQTT_PASSWORD"
cert_file_path = "/client_certificate.crt.der"
key_file_path = "/client_certificate.key.der"
cert_fingerprint = "{FINGERPRINT}"
topic_prefix = "mobile/esp_"
led_pin = 0
onboard_led_pin = 2
use_onboard_led = true
sensor_pin = 4
sensor_type = "DHT11"

[[access_points]]
ssid = "AP_1"
password = "password_AP1"
"#
        )
    }

    fn no_secrets() -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn resolve(text: &str) -> Result<Settings, LoadError> {
        RawConfig::from_toml_str(text)?.resolve(&no_secrets())
    }

    fn invalid(result: Result<Settings, LoadError>) -> ConfigError {
        match result {
            Err(LoadError::Invalid(e)) => e,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_sample() {
        let settings = resolve(&sample_toml()).unwrap();
        assert_eq!(settings.broker_address(), "mqtt.example.net");
        assert_eq!(settings.access_point_count(), 1);
        assert_eq!(settings.access_points()[0].ssid(), "AP_1");
        assert_eq!(settings.sensor_type(), SensorKind::Dht11);
        assert_eq!(settings.board(), Board::Esp32);
        assert_eq!(settings.cert_fingerprint().to_string(), FINGERPRINT);
    }

    #[test]
    fn test_shipped_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(CONFIG_FILE);
        let settings = Settings::load(&path, &EnvSecrets).unwrap();
        assert!(settings.access_point_count() >= 1);
    }

    #[test]
    fn test_missing_field_is_named() {
        let text = sample_toml().replace("broker_port = 7906\n", "");
        let err = invalid(resolve(&text));
        assert_eq!(err, ConfigError::Missing(Field::BrokerPort));
        assert_eq!(err.to_string(), "broker_port: required field is missing");
    }

    #[test]
    fn test_non_numeric_port_is_malformed() {
        let text = sample_toml().replace("broker_port = 7906", "broker_port = \"7906\"");
        let err = resolve(&text).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
        assert!(err.to_string().contains("broker_port"));
    }

    #[test]
    fn test_port_out_of_range_is_malformed() {
        let text = sample_toml().replace("broker_port = 7906", "broker_port = 70000");
        assert!(matches!(resolve(&text), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let text = format!("mqtt_hostnme = \"x\"\n{}", sample_toml());
        assert!(matches!(resolve(&text), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_count_mismatch() {
        let text = format!("access_point_count = 2\n{}", sample_toml());
        assert_eq!(
            invalid(resolve(&text)),
            ConfigError::AccessPointCountMismatch {
                declared: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_matching_count_accepted() {
        let text = format!("access_point_count = 1\n{}", sample_toml());
        assert_eq!(resolve(&text).unwrap().access_point_count(), 1);
    }

    #[test]
    fn test_empty_fingerprint_fails() {
        let text = sample_toml().replace(FINGERPRINT, "");
        assert_eq!(
            invalid(resolve(&text)),
            ConfigError::Empty(Field::CertFingerprint)
        );
    }

    #[test]
    fn test_no_access_points() {
        let text = sample_toml().replace(
            "[[access_points]]\nssid = \"AP_1\"\npassword = \"password_AP1\"\n",
            "",
        );
        assert_eq!(invalid(resolve(&text)), ConfigError::NoAccessPoints);
    }

    #[test]
    fn test_access_point_without_password() {
        let text = sample_toml().replace("password = \"password_AP1\"\n", "");
        assert!(matches!(
            invalid(resolve(&text)),
            ConfigError::InvalidPassphrase { index: 0, .. }
        ));
    }

    #[test]
    fn test_board_and_aliases() {
        let text = sample_toml().replace("\"DHT11\"", "\"am2302\"");
        let text = format!("board = \"esp8266\"\n{}", text);
        let settings = resolve(&text).unwrap();
        assert_eq!(settings.board(), Board::Esp8266);
        assert_eq!(settings.sensor_type(), SensorKind::Dht22);
    }

    #[test]
    fn test_pin_collision() {
        let text = sample_toml().replace("sensor_pin = 4", "sensor_pin = 0");
        assert_eq!(
            invalid(resolve(&text)),
            ConfigError::PinCollision {
                first: Field::LedPin,
                second: Field::SensorPin,
                pin: 0
            }
        );
    }

    #[test]
    fn test_env_secrets() {
        let text = sample_toml()
            .replace("password = \"MQTT_PASSWORD\"", "password = { env = \"TEST_MQTT_PASSWORD\" }")
            .replace(
                "password = \"password_AP1\"",
                "password = { env = \"TEST_AP1_PASSWORD\" }",
            );
        let raw = RawConfig::from_toml_str(&text).unwrap();
        assert_eq!(raw.secret_names(), vec!["TEST_MQTT_PASSWORD", "TEST_AP1_PASSWORD"]);

        let mut secrets = BTreeMap::new();
        secrets.insert("TEST_MQTT_PASSWORD".to_string(), "from-env".to_string());
        let err = raw.resolve(&secrets).unwrap_err();
        assert!(matches!(
            err,
            LoadError::SecretUnavailable {
                field: Field::AccessPoints,
                ref name
            } if name == "TEST_AP1_PASSWORD"
        ));

        secrets.insert("TEST_AP1_PASSWORD".to_string(), "wifi-secret".to_string());
        let settings = raw.resolve(&secrets).unwrap();
        assert_eq!(settings.password.expose(), "from-env");
        assert_eq!(settings.access_points()[0].password().expose(), "wifi-secret");
    }

    #[test]
    fn test_secrets_are_redacted() {
        let settings = resolve(&sample_toml()).unwrap();
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("MQTT_PASSWORD"));
        assert!(!debug.contains("password_AP1"));

        let raw = RawConfig::from_toml_str(&sample_toml()).unwrap();
        assert!(!format!("{:?}", raw).contains("password_AP1"));
    }

    #[test]
    fn test_raw_round_trip() {
        let text = sample_toml().replace(
            "password = \"MQTT_PASSWORD\"",
            "password = { env = \"MQTT_PASSWORD\" }",
        );
        let raw = RawConfig::from_toml_str(&text).unwrap();
        let reloaded = RawConfig::from_toml_str(&raw.to_toml_string().unwrap()).unwrap();
        assert_eq!(raw, reloaded);
    }

    #[test]
    fn test_settings_round_trip() {
        let settings = resolve(&sample_toml()).unwrap();
        let text = settings.to_raw().to_toml_string().unwrap();
        let reloaded = resolve(&text).unwrap();
        assert_eq!(settings, reloaded);
    }

    #[test]
    fn test_rust_const() {
        let code = resolve(&sample_toml()).unwrap().to_rust_const();
        assert!(code.contains("pub const CONFIG: Config = Config {"));
        assert!(code.contains("broker_address: \"mqtt.example.net\","));
        assert!(code.contains("cert_fingerprint: Fingerprint::Sha1([0xaa, 0xbb,"));
        assert!(code.contains("AccessPoint::new(\"AP_1\", \"password_AP1\"),"));
        assert!(code.contains("sensor_type: SensorKind::Dht11,"));
        assert!(code.contains("board: Board::Esp32,"));
        assert!(!code.contains("access_point_count"));
    }

    #[test]
    fn test_config_path_default() {
        if env::var_os(CONFIG_PATH_ENV).is_none() {
            assert_eq!(config_path(Path::new("/fw")), Path::new("/fw/cfg.toml"));
        }
    }
}
