//! Actor identity

use std::fmt;

/// Opaque identifier of an authenticated actor
///
/// Actors are owned and authenticated outside this system; the only rule
/// applied here is that the identifier is non-empty. Ordering is plain byte
/// order of the identifier, which is the total order used for canonical pairs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActorId(String);

impl ActorId {
    /// Create an actor id, trimming surrounding whitespace
    ///
    /// # Errors
    /// Returns error if the identifier is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use studylink_domain::ActorId;
    ///
    /// let alice = ActorId::new("alice").unwrap();
    /// assert_eq!(alice.as_str(), "alice");
    /// assert!(ActorId::new("   ").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("Actor id cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ActorId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
