use core::fmt::{self, Write};

use heapless::String;

use crate::constants::{MAX_DEVICE_ID_LEN, MAX_TOPIC_LEN};

pub type Topic = String<MAX_TOPIC_LEN>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicError {
    EmptyDeviceId,
    DeviceIdTooLong,
    /// Device ids are limited to ASCII letters, digits, '-' and '_'.
    InvalidDeviceId,
    TooLong,
}

impl fmt::Display for TopicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDeviceId => write!(f, "device id is empty"),
            Self::DeviceIdTooLong => write!(f, "device id exceeds {} bytes", MAX_DEVICE_ID_LEN),
            Self::InvalidDeviceId => write!(f, "device id may only contain [A-Za-z0-9_-]"),
            Self::TooLong => write!(f, "topic exceeds {} bytes", MAX_TOPIC_LEN),
        }
    }
}

impl core::error::Error for TopicError {}

/// Identifier appended to the topic prefix, unique per device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceId(String<MAX_DEVICE_ID_LEN>);

impl DeviceId {
    pub fn parse(s: &str) -> Result<Self, TopicError> {
        if s.is_empty() {
            return Err(TopicError::EmptyDeviceId);
        }
        if !s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(TopicError::InvalidDeviceId);
        }
        let mut id = String::new();
        id.push_str(s).map_err(|_| TopicError::DeviceIdTooLong)?;
        Ok(Self(id))
    }

    /// Chip id style: lowercase hex of the three NIC-specific MAC bytes.
    pub fn from_mac(mac: [u8; 6]) -> Self {
        let mut id = String::new();
        for byte in &mac[3..] {
            // 6 hex digits always fit
            let _ = write!(id, "{:02x}", byte);
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `prefix` followed directly by the device id. Never truncates.
pub fn publish_topic(prefix: &str, device_id: &DeviceId) -> Result<Topic, TopicError> {
    let mut topic = Topic::new();
    topic.push_str(prefix).map_err(|_| TopicError::TooLong)?;
    topic
        .push_str(device_id.as_str())
        .map_err(|_| TopicError::TooLong)?;
    Ok(topic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::rules;
    use proptest::prelude::*;

    #[test]
    fn test_device_id_from_mac() {
        let id = DeviceId::from_mac([0x24, 0x0a, 0xc4, 0xab, 0x0c, 0x01]);
        assert_eq!(id.as_str(), "ab0c01");
    }

    #[test]
    fn test_device_id_parse() {
        assert_eq!(DeviceId::parse("node-7_a").unwrap().as_str(), "node-7_a");
        assert_eq!(DeviceId::parse(""), Err(TopicError::EmptyDeviceId));
        assert_eq!(DeviceId::parse("a b"), Err(TopicError::InvalidDeviceId));
        assert_eq!(DeviceId::parse("a/b"), Err(TopicError::InvalidDeviceId));
        assert_eq!(DeviceId::parse("#"), Err(TopicError::InvalidDeviceId));
        assert_eq!(
            DeviceId::parse(&"a".repeat(MAX_DEVICE_ID_LEN + 1)),
            Err(TopicError::DeviceIdTooLong)
        );
    }

    #[test]
    fn test_publish_topic() {
        let id = DeviceId::parse("1a2b3c").unwrap();
        let topic = publish_topic("mobile/esp_", &id).unwrap();
        assert_eq!(topic.as_str(), "mobile/esp_1a2b3c");
    }

    #[test]
    fn test_publish_topic_too_long() {
        let prefix = "p".repeat(MAX_TOPIC_LEN - 2);
        let id = DeviceId::parse("abc").unwrap();
        assert_eq!(publish_topic(&prefix, &id), Err(TopicError::TooLong));
    }

    proptest! {
        #[test]
        fn prop_topic_has_no_whitespace(
            prefix in "[a-z0-9/_.-]{1,96}",
            id in "[A-Za-z0-9_-]{1,32}",
        ) {
            prop_assume!(rules::topic_prefix(&prefix).is_ok());
            let id = DeviceId::parse(&id).unwrap();
            let topic = publish_topic(&prefix, &id).unwrap();
            prop_assert!(!topic.chars().any(char::is_whitespace));
            prop_assert!(topic.starts_with(prefix.as_str()));
            prop_assert!(topic.ends_with(id.as_str()));
        }

        #[test]
        fn prop_mac_ids_are_valid(mac in any::<[u8; 6]>()) {
            let id = DeviceId::from_mac(mac);
            prop_assert_eq!(id.as_str().len(), 6);
            prop_assert_eq!(DeviceId::parse(id.as_str()), Ok(id.clone()));
        }
    }
}
