// Shared with build.rs, keep this file core-only.

use core::fmt;

use super::types::Board;

/// Name of a configuration field, as spelled in `cfg.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    BrokerAddress,
    BrokerPort,
    BrokerPortSecure,
    Username,
    Password,
    CertFilePath,
    KeyFilePath,
    CertFingerprint,
    TopicPrefix,
    AccessPoints,
    AccessPointCount,
    LedPin,
    OnboardLedPin,
    UseOnboardLed,
    SensorPin,
    SensorType,
    Board,
}

impl Field {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BrokerAddress => "broker_address",
            Self::BrokerPort => "broker_port",
            Self::BrokerPortSecure => "broker_port_secure",
            Self::Username => "username",
            Self::Password => "password",
            Self::CertFilePath => "cert_file_path",
            Self::KeyFilePath => "key_file_path",
            Self::CertFingerprint => "cert_fingerprint",
            Self::TopicPrefix => "topic_prefix",
            Self::AccessPoints => "access_points",
            Self::AccessPointCount => "access_point_count",
            Self::LedPin => "led_pin",
            Self::OnboardLedPin => "onboard_led_pin",
            Self::UseOnboardLed => "use_onboard_led",
            Self::SensorPin => "sensor_pin",
            Self::SensorType => "sensor_type",
            Self::Board => "board",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configuration record that must not be used.
///
/// Every variant names the offending field so a failed build or boot points
/// straight at the `cfg.toml` key to fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required field absent from the file.
    Missing(Field),
    /// Field present but empty.
    Empty(Field),
    /// Port outside 1..=65535.
    InvalidPort(Field),
    /// Plaintext and TLS ports are the same.
    PortsCollide(u16),
    /// Field fails its shape constraint.
    InvalidValue { field: Field, reason: &'static str },
    /// `access_points` has no entries.
    NoAccessPoints,
    TooManyAccessPoints { count: usize, max: usize },
    /// Redundant `access_point_count` disagrees with the list.
    AccessPointCountMismatch { declared: usize, actual: usize },
    InvalidSsid { index: usize, reason: &'static str },
    InvalidPassphrase { index: usize, reason: &'static str },
    /// GPIO cannot serve this role on the target board.
    PinUnusable { field: Field, pin: u8, board: Board },
    /// Two roles share one GPIO.
    PinCollision { first: Field, second: Field, pin: u8 },
}

impl ConfigError {
    /// The field a diagnostic should point at.
    pub fn field(&self) -> Field {
        match self {
            Self::Missing(field)
            | Self::Empty(field)
            | Self::InvalidPort(field)
            | Self::InvalidValue { field, .. }
            | Self::PinUnusable { field, .. } => *field,
            Self::PortsCollide(_) => Field::BrokerPortSecure,
            Self::NoAccessPoints
            | Self::TooManyAccessPoints { .. }
            | Self::InvalidSsid { .. }
            | Self::InvalidPassphrase { .. } => Field::AccessPoints,
            Self::AccessPointCountMismatch { .. } => Field::AccessPointCount,
            Self::PinCollision { second, .. } => *second,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(field) => write!(f, "{}: required field is missing", field),
            Self::Empty(field) => write!(f, "{}: must not be empty", field),
            Self::InvalidPort(field) => write!(f, "{}: port must be in 1..=65535", field),
            Self::PortsCollide(port) => write!(
                f,
                "broker_port_secure: must differ from broker_port (both {})",
                port
            ),
            Self::InvalidValue { field, reason } => write!(f, "{}: {}", field, reason),
            Self::NoAccessPoints => write!(f, "access_points: at least one access point is required"),
            Self::TooManyAccessPoints { count, max } => {
                write!(f, "access_points: {} entries (max {})", count, max)
            }
            Self::AccessPointCountMismatch { declared, actual } => write!(
                f,
                "access_point_count: declares {} but access_points has {}",
                declared, actual
            ),
            Self::InvalidSsid { index, reason } => {
                write!(f, "access_points[{}].ssid: {}", index, reason)
            }
            Self::InvalidPassphrase { index, reason } => {
                write!(f, "access_points[{}].password: {}", index, reason)
            }
            Self::PinUnusable { field, pin, board } => write!(
                f,
                "{}: GPIO{} cannot be used for this role on {}",
                field, pin, board
            ),
            Self::PinCollision { first, second, pin } => {
                write!(f, "{}: GPIO{} is already used by {}", second, pin, first)
            }
        }
    }
}

impl core::error::Error for ConfigError {}
