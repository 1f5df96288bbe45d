// Shared with build.rs, keep this file core-only.

use core::fmt;
use core::str::FromStr;

use super::error::{ConfigError, Field};

/// Wi-Fi credentials for one access point.
///
/// Access points are listed in order of preference.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AccessPoint<'a> {
    ssid: &'a str,
    password: &'a str,
}

impl<'a> AccessPoint<'a> {
    pub const fn new(ssid: &'a str, password: &'a str) -> Self {
        Self { ssid, password }
    }

    pub const fn ssid(&self) -> &'a str {
        self.ssid
    }

    pub const fn password(&self) -> &'a str {
        self.password
    }

    /// Open network (no passphrase).
    pub const fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

impl fmt::Debug for AccessPoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessPoint")
            .field("ssid", &self.ssid)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Which broker listener a client should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Security {
    Plain,
    Tls,
}

/// Target SoC, selects the GPIO map used to check pin assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Board {
    #[default]
    Esp32,
    Esp8266,
}

/// What a GPIO can do on a given board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinCapability {
    /// No such pad on this SoC.
    Absent,
    /// Wired to the SPI flash.
    Flash,
    InputOnly,
    InputOutput,
}

impl Board {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Esp32 => "esp32",
            Self::Esp8266 => "esp8266",
        }
    }

    pub const fn pin_capability(&self, pin: u8) -> PinCapability {
        match self {
            Self::Esp32 => match pin {
                6..=11 => PinCapability::Flash,
                0..=5 | 12..=19 | 21..=23 | 25..=27 | 32 | 33 => PinCapability::InputOutput,
                34..=39 => PinCapability::InputOnly,
                _ => PinCapability::Absent,
            },
            Self::Esp8266 => match pin {
                6..=11 => PinCapability::Flash,
                0..=5 | 12..=16 => PinCapability::InputOutput,
                _ => PinCapability::Absent,
            },
        }
    }

    /// Pin can be driven as an output.
    pub const fn is_output_capable(&self, pin: u8) -> bool {
        matches!(self.pin_capability(pin), PinCapability::InputOutput)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Board {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("esp32") {
            Ok(Self::Esp32)
        } else if s.eq_ignore_ascii_case("esp8266") {
            Ok(Self::Esp8266)
        } else {
            Err(ConfigError::InvalidValue {
                field: Field::Board,
                reason: "expected esp32 or esp8266",
            })
        }
    }
}

/// DHT-family sensor model attached to `sensor_pin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Dht11,
    Dht12,
    /// Also sold as AM2301.
    Dht21,
    /// Also sold as AM2302.
    Dht22,
}

/// Wire timing and rated range of a sensor model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingProfile {
    /// How long the host holds the bus low to request a sample.
    pub start_signal_low_us: u32,
    /// Minimum time between two samples.
    pub min_sample_interval_ms: u32,
    /// Rated temperature range in degrees Celsius.
    pub temperature_range: (f32, f32),
    /// Rated relative humidity range in percent.
    pub humidity_range: (f32, f32),
    /// Smallest temperature step the sensor reports.
    pub temperature_resolution: f32,
}

impl SensorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dht11 => "DHT11",
            Self::Dht12 => "DHT12",
            Self::Dht21 => "DHT21",
            Self::Dht22 => "DHT22",
        }
    }

    pub const fn profile(&self) -> TimingProfile {
        match self {
            Self::Dht11 => TimingProfile {
                start_signal_low_us: 20_000,
                min_sample_interval_ms: 1_000,
                temperature_range: (0.0, 50.0),
                humidity_range: (20.0, 90.0),
                temperature_resolution: 1.0,
            },
            Self::Dht12 => TimingProfile {
                start_signal_low_us: 20_000,
                min_sample_interval_ms: 2_000,
                temperature_range: (-20.0, 60.0),
                humidity_range: (20.0, 95.0),
                temperature_resolution: 0.1,
            },
            Self::Dht21 | Self::Dht22 => TimingProfile {
                start_signal_low_us: 1_100,
                min_sample_interval_ms: 2_000,
                temperature_range: (-40.0, 80.0),
                humidity_range: (0.0, 100.0),
                temperature_resolution: 0.1,
            },
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const NAMES: [(&str, SensorKind); 6] = [
            ("DHT11", SensorKind::Dht11),
            ("DHT12", SensorKind::Dht12),
            ("DHT21", SensorKind::Dht21),
            ("AM2301", SensorKind::Dht21),
            ("DHT22", SensorKind::Dht22),
            ("AM2302", SensorKind::Dht22),
        ];

        let s = s.trim();
        NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, kind)| *kind)
            .ok_or(ConfigError::InvalidValue {
                field: Field::SensorType,
                reason: "expected one of DHT11, DHT12, DHT21 (AM2301), DHT22 (AM2302)",
            })
    }
}

/// Pinned broker certificate digest.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Fingerprint {
    Sha1([u8; 20]),
    Sha256([u8; 32]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerprintError {
    Empty,
    InvalidByte,
    /// Neither 20 (SHA-1) nor 32 (SHA-256) bytes.
    InvalidLength(usize),
}

impl FingerprintError {
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Empty => "fingerprint is empty",
            Self::InvalidByte => "expected two hex digits per byte, separated by ':' or ' '",
            Self::InvalidLength(_) => "expected 20 (SHA-1) or 32 (SHA-256) bytes",
        }
    }
}

impl Fingerprint {
    /// Parse `AB:CD:...` (or space separated) hex, case-insensitive.
    pub fn parse(s: &str) -> Result<Self, FingerprintError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FingerprintError::Empty);
        }

        let mut bytes = [0u8; 32];
        let mut len = 0;
        for part in s.split([':', ' ']).filter(|part| !part.is_empty()) {
            let part = part.as_bytes();
            if part.len() != 2 {
                return Err(FingerprintError::InvalidByte);
            }
            let byte = (hex_value(part[0])? << 4) | hex_value(part[1])?;
            if len < bytes.len() {
                bytes[len] = byte;
            }
            len += 1;
        }

        match len {
            20 => {
                let mut sha1 = [0u8; 20];
                sha1.copy_from_slice(&bytes[..20]);
                Ok(Self::Sha1(sha1))
            }
            32 => Ok(Self::Sha256(bytes)),
            n => Err(FingerprintError::InvalidLength(n)),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Sha1(bytes) => bytes,
            Self::Sha256(bytes) => bytes,
        }
    }

    /// Compare against a certificate digest without early exit.
    pub fn matches(&self, digest: &[u8]) -> bool {
        let expected = self.as_bytes();
        if expected.len() != digest.len() {
            return false;
        }
        expected
            .iter()
            .zip(digest)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

fn hex_value(digit: u8) -> Result<u8, FingerprintError> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(FingerprintError::InvalidByte),
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.as_bytes().iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1(_) => write!(f, "Sha1({})", self),
            Self::Sha256(_) => write!(f, "Sha256({})", self),
        }
    }
}
