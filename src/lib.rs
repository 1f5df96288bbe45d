//! Configuration record for an ESP32 node that publishes DHT temperature and
//! humidity readings to an MQTT broker.
//!
//! The library is `no_std` so the firmware can use it. With the default `std`
//! feature it also carries the `cfg.toml` loader used by the build script and
//! the host tests.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod config;
pub mod constants;
pub mod topic;

pub use config::{Config, ConfigError, Field, CONFIG};
pub use topic::{DeviceId, Topic, TopicError};
