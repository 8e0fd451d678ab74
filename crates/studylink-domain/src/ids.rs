//! Identifiers for requests and links
//!
//! Both identifiers are UUIDv7 values held as a raw `u128`, which gives
//! chronological sortability and needs no coordination to generate.

use std::fmt;

macro_rules! uuid_v7_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u128);

        impl $name {
            /// Generate a new UUIDv7-based identifier
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7().as_u128())
            }

            /// Create an identifier from a raw u128 value
            ///
            /// This is primarily for storage layer deserialization.
            pub fn from_value(value: u128) -> Self {
                Self(value)
            }

            /// Parse an identifier from its hyphenated UUID form
            pub fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s.trim())
                    .map(|u| Self(u.as_u128()))
                    .map_err(|e| format!("Invalid {} '{}': {}", stringify!($name), s, e))
            }

            /// Get the raw u128 value
            pub fn value(&self) -> u128 {
                self.0
            }

            /// Big-endian byte representation, used as the storage key
            pub fn to_bytes(&self) -> [u8; 16] {
                self.0.to_be_bytes()
            }

            /// Rebuild an identifier from its big-endian storage bytes
            pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
                let arr: [u8; 16] = bytes.try_into().map_err(|_| {
                    format!(
                        "Expected 16 bytes for {}, got {}",
                        stringify!($name),
                        bytes.len()
                    )
                })?;
                Ok(Self(u128::from_be_bytes(arr)))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", uuid::Uuid::from_u128(self.0))
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_string(s)
            }
        }
    };
}

uuid_v7_id! {
    /// Unique identifier of a [`StudyRequest`](crate::StudyRequest)
    RequestId
}

uuid_v7_id! {
    /// Unique identifier of a [`StudyLink`](crate::StudyLink)
    LinkId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let id = RequestId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(RequestId::from_string(&text).unwrap(), id);
    }

    #[test]
    fn test_invalid_string() {
        assert!(LinkId::from_string("not-a-uuid").is_err());
        assert!(LinkId::from_string("").is_err());
    }

    #[test]
    fn test_bytes_length_checked() {
        assert!(RequestId::from_bytes(&[0u8; 15]).is_err());
        let id = RequestId::from_value(42);
        assert_eq!(RequestId::from_bytes(&id.to_bytes()).unwrap(), id);
    }

    #[test]
    fn test_generated_ids_are_ordered() {
        let first = LinkId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = LinkId::new();
        assert!(first < second);
    }
}
