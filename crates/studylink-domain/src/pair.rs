//! Canonical unordered actor pairs
//!
//! Every uniqueness rule in the system is keyed on the unordered pair of
//! actors. Normalizing `(x, y)` and `(y, x)` to the same value before any
//! lookup or insert means a single stored row per pair and plain equality
//! queries instead of `OR`-based ones.

use crate::ActorId;

/// An unordered pair of two distinct actors, stored smallest-first
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalPair {
    low: ActorId,
    high: ActorId,
}

impl CanonicalPair {
    /// Normalize two actors into a canonical pair
    ///
    /// Returns `None` when both sides are the same actor.
    ///
    /// # Examples
    ///
    /// ```
    /// use studylink_domain::{ActorId, CanonicalPair};
    ///
    /// let alice = ActorId::new("alice").unwrap();
    /// let bob = ActorId::new("bob").unwrap();
    ///
    /// let forward = CanonicalPair::new(&alice, &bob).unwrap();
    /// let backward = CanonicalPair::new(&bob, &alice).unwrap();
    /// assert_eq!(forward, backward);
    /// assert_eq!(forward.low(), &alice);
    /// assert!(CanonicalPair::new(&alice, &alice).is_none());
    /// ```
    pub fn new(a: &ActorId, b: &ActorId) -> Option<Self> {
        if a == b {
            return None;
        }
        Some(Self::ordered(a, b))
    }

    /// Normalize two actors already known to be distinct
    pub(crate) fn ordered(a: &ActorId, b: &ActorId) -> Self {
        if a <= b {
            Self {
                low: a.clone(),
                high: b.clone(),
            }
        } else {
            Self {
                low: b.clone(),
                high: a.clone(),
            }
        }
    }

    /// The smaller actor of the pair
    pub fn low(&self) -> &ActorId {
        &self.low
    }

    /// The larger actor of the pair
    pub fn high(&self) -> &ActorId {
        &self.high
    }

    /// Whether the actor is one of the two members
    pub fn contains(&self, actor: &ActorId) -> bool {
        &self.low == actor || &self.high == actor
    }

    /// The member that is not `actor`, if `actor` belongs to the pair
    pub fn other(&self, actor: &ActorId) -> Option<&ActorId> {
        if &self.low == actor {
            Some(&self.high)
        } else if &self.high == actor {
            Some(&self.low)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(s: &str) -> ActorId {
        ActorId::new(s).unwrap()
    }

    #[test]
    fn test_other_member() {
        let pair = CanonicalPair::new(&actor("zoe"), &actor("adam")).unwrap();
        assert_eq!(pair.low(), &actor("adam"));
        assert_eq!(pair.other(&actor("adam")), Some(&actor("zoe")));
        assert_eq!(pair.other(&actor("zoe")), Some(&actor("adam")));
        assert_eq!(pair.other(&actor("eve")), None);
        assert!(!pair.contains(&actor("eve")));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: argument order never changes the canonical pair
        #[test]
        fn test_pair_is_order_independent(a in "[a-z0-9]{1,12}", b in "[a-z0-9]{1,12}") {
            let a = ActorId::new(a).unwrap();
            let b = ActorId::new(b).unwrap();

            match (CanonicalPair::new(&a, &b), CanonicalPair::new(&b, &a)) {
                (Some(forward), Some(backward)) => {
                    prop_assert_eq!(&forward, &backward);
                    prop_assert!(forward.low() < forward.high());
                }
                (None, None) => prop_assert_eq!(a, b),
                _ => return Err(TestCaseError::fail("asymmetric normalization")),
            }
        }
    }
}
