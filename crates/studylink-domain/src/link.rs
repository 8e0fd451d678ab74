//! Study links - confirmed undirected partnerships

use crate::{ActorId, CanonicalPair, LinkId};

/// A confirmed partnership between two distinct actors
///
/// Members are always held in canonical order (`member_a < member_b`), so
/// at most one link can ever exist per unordered pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyLink {
    /// Unique identifier
    pub id: LinkId,

    /// Smaller member of the canonical pair
    pub member_a: ActorId,

    /// Larger member of the canonical pair
    pub member_b: ActorId,

    /// When the link was established (milliseconds since Unix epoch)
    pub created_at: u64,
}

impl StudyLink {
    /// Create a new link for a canonical pair
    pub fn new(pair: &CanonicalPair, created_at: u64) -> Self {
        Self {
            id: LinkId::new(),
            member_a: pair.low().clone(),
            member_b: pair.high().clone(),
            created_at,
        }
    }

    /// The canonical pair of the two members
    pub fn pair(&self) -> CanonicalPair {
        CanonicalPair::ordered(&self.member_a, &self.member_b)
    }

    /// The other member, if `actor` is part of this link
    pub fn partner_of(&self, actor: &ActorId) -> Option<&ActorId> {
        if &self.member_a == actor {
            Some(&self.member_b)
        } else if &self.member_b == actor {
            Some(&self.member_a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_are_canonical() {
        let bob = ActorId::new("bob").unwrap();
        let alice = ActorId::new("alice").unwrap();
        let pair = CanonicalPair::new(&bob, &alice).unwrap();

        let link = StudyLink::new(&pair, 5);
        assert_eq!(link.member_a, alice);
        assert_eq!(link.member_b, bob);
        assert_eq!(link.pair(), pair);
        assert_eq!(link.partner_of(&bob), Some(&alice));
        assert_eq!(link.partner_of(&ActorId::new("carol").unwrap()), None);
    }
}
