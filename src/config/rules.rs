// Shared with build.rs, keep this file core-only.
//
// Field checks run once when `cfg.toml` is loaded and again on the generated
// record at boot.

use super::error::{ConfigError, Field};
use super::types::{Board, Fingerprint, PinCapability};

/// Upper bound on configured access points.
pub const MAX_ACCESS_POINTS: usize = 8;

/// Maximum SSID length per IEEE 802.11.
pub const MAX_SSID_LEN: usize = 32;

/// WPA2 passphrase bounds; 64 characters means a raw hex PSK.
pub const MIN_PASSPHRASE_LEN: usize = 8;
pub const MAX_PASSPHRASE_LEN: usize = 63;
pub const PSK_HEX_LEN: usize = 64;

pub const MAX_HOSTNAME_LEN: usize = 253;

/// Leaves room for the device id within a 128 byte topic.
pub const MAX_TOPIC_PREFIX_LEN: usize = 96;

pub fn non_empty(field: Field, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Empty(field));
    }
    Ok(())
}

pub fn broker_address(value: &str) -> Result<(), ConfigError> {
    non_empty(Field::BrokerAddress, value)?;
    if value.len() > MAX_HOSTNAME_LEN {
        return Err(ConfigError::InvalidValue {
            field: Field::BrokerAddress,
            reason: "hostname longer than 253 bytes",
        });
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ConfigError::InvalidValue {
            field: Field::BrokerAddress,
            reason: "hostname contains whitespace or control characters",
        });
    }
    Ok(())
}

pub fn port(field: Field, value: u16) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidPort(field));
    }
    Ok(())
}

pub fn broker_ports(plain: u16, secure: u16) -> Result<(), ConfigError> {
    port(Field::BrokerPort, plain)?;
    port(Field::BrokerPortSecure, secure)?;
    if plain == secure {
        return Err(ConfigError::PortsCollide(plain));
    }
    Ok(())
}

/// Path on the device flash filesystem.
pub fn flash_path(field: Field, value: &str) -> Result<(), ConfigError> {
    non_empty(field, value)?;
    if !value.starts_with('/') {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "path must be absolute (start with '/')",
        });
    }
    if value.len() == 1 || value.ends_with('/') {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "path must name a file",
        });
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "path contains whitespace or control characters",
        });
    }
    Ok(())
}

pub fn client_credentials(cert_path: &str, key_path: &str) -> Result<(), ConfigError> {
    flash_path(Field::CertFilePath, cert_path)?;
    flash_path(Field::KeyFilePath, key_path)?;
    if cert_path == key_path {
        return Err(ConfigError::InvalidValue {
            field: Field::KeyFilePath,
            reason: "key and certificate must be separate files",
        });
    }
    Ok(())
}

pub fn fingerprint(value: &str) -> Result<Fingerprint, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Empty(Field::CertFingerprint));
    }
    Fingerprint::parse(value).map_err(|e| ConfigError::InvalidValue {
        field: Field::CertFingerprint,
        reason: e.reason(),
    })
}

pub fn topic_prefix(value: &str) -> Result<(), ConfigError> {
    non_empty(Field::TopicPrefix, value)?;
    if value.len() > MAX_TOPIC_PREFIX_LEN {
        return Err(ConfigError::InvalidValue {
            field: Field::TopicPrefix,
            reason: "prefix longer than 96 bytes",
        });
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ConfigError::InvalidValue {
            field: Field::TopicPrefix,
            reason: "prefix contains whitespace or control characters",
        });
    }
    if value.contains(['+', '#']) {
        return Err(ConfigError::InvalidValue {
            field: Field::TopicPrefix,
            reason: "wildcards '+' and '#' are not allowed in a publish topic",
        });
    }
    Ok(())
}

pub fn ssid(index: usize, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::InvalidSsid {
            index,
            reason: "must not be empty",
        });
    }
    if value.len() > MAX_SSID_LEN {
        return Err(ConfigError::InvalidSsid {
            index,
            reason: "longer than 32 bytes",
        });
    }
    Ok(())
}

/// Empty means an open network.
pub fn passphrase(index: usize, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Ok(());
    }
    if value.len() == PSK_HEX_LEN {
        if value.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Ok(());
        }
        return Err(ConfigError::InvalidPassphrase {
            index,
            reason: "64 character passphrase must be a hex PSK",
        });
    }
    if value.len() < MIN_PASSPHRASE_LEN {
        return Err(ConfigError::InvalidPassphrase {
            index,
            reason: "shorter than 8 characters",
        });
    }
    if value.len() > MAX_PASSPHRASE_LEN {
        return Err(ConfigError::InvalidPassphrase {
            index,
            reason: "longer than 63 characters",
        });
    }
    if !value.bytes().all(|b| (0x20..=0x7e).contains(&b)) {
        return Err(ConfigError::InvalidPassphrase {
            index,
            reason: "must be printable ASCII",
        });
    }
    Ok(())
}

/// `entries` yields `(ssid, password)` in preference order. `declared` is the
/// optional redundant count from the file.
pub fn access_points<'a, I>(entries: I, declared: Option<usize>) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut count = 0;
    for (index, (ssid_value, password)) in entries.into_iter().enumerate() {
        ssid(index, ssid_value)?;
        passphrase(index, password)?;
        count += 1;
    }

    if let Some(declared) = declared {
        if declared != count {
            return Err(ConfigError::AccessPointCountMismatch {
                declared,
                actual: count,
            });
        }
    }
    if count == 0 {
        return Err(ConfigError::NoAccessPoints);
    }
    if count > MAX_ACCESS_POINTS {
        return Err(ConfigError::TooManyAccessPoints {
            count,
            max: MAX_ACCESS_POINTS,
        });
    }
    Ok(())
}

/// LED pins must be outputs, the sensor pin must be a bidirectional
/// single-wire bus, and the sensor may not share a pad with either LED.
/// `led_pin` and `onboard_led_pin` may coincide.
pub fn pins(board: Board, led: u8, onboard_led: u8, sensor: u8) -> Result<(), ConfigError> {
    for (field, pin) in [
        (Field::LedPin, led),
        (Field::OnboardLedPin, onboard_led),
        (Field::SensorPin, sensor),
    ] {
        if board.pin_capability(pin) != PinCapability::InputOutput {
            return Err(ConfigError::PinUnusable { field, pin, board });
        }
    }

    if sensor == led {
        return Err(ConfigError::PinCollision {
            first: Field::LedPin,
            second: Field::SensorPin,
            pin: sensor,
        });
    }
    if sensor == onboard_led {
        return Err(ConfigError::PinCollision {
            first: Field::OnboardLedPin,
            second: Field::SensorPin,
            pin: sensor,
        });
    }
    Ok(())
}
