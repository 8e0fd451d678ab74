//! Link registry
//!
//! Owns the set of confirmed partnerships. Every function canonicalizes the
//! actor pair before touching the store, so argument order never matters.
//! Writes take a [`Tx`] and therefore only run inside the consistency guard.

use crate::ServiceError;
use studylink_domain::{ActorId, CanonicalPair, LinkId, StudyLink, StudyRequest};
use studylink_store::{SqliteStore, Tx};

/// Confirmation returned by a successful partner removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// The deleted link
    pub link: StudyLink,

    /// The closed history record appended for the removal
    pub history: StudyRequest,
}

impl Removal {
    /// Identifier of the deleted link
    pub fn link_id(&self) -> LinkId {
        self.link.id
    }
}

/// Whether a link exists for the unordered pair
///
/// An actor is never linked to itself.
pub fn exists(tx: &Tx<'_>, a: &ActorId, b: &ActorId) -> Result<bool, ServiceError> {
    match CanonicalPair::new(a, b) {
        Some(pair) => Ok(tx.link_for_pair(&pair)?.is_some()),
        None => Ok(false),
    }
}

/// Create a link for the unordered pair
///
/// Fails with [`ServiceError::AlreadyLinked`] if the pair is already linked,
/// whether that is seen by the lookup or by the unique constraint.
pub fn create(
    tx: &Tx<'_>,
    a: &ActorId,
    b: &ActorId,
    now: u64,
) -> Result<StudyLink, ServiceError> {
    let pair = CanonicalPair::new(a, b).ok_or(ServiceError::SelfRequest)?;
    if tx.link_for_pair(&pair)?.is_some() {
        return Err(ServiceError::AlreadyLinked);
    }

    let link = StudyLink::new(&pair, now);
    tx.insert_link(&link)?;
    Ok(link)
}

/// Delete the link between `remover` and `partner`
///
/// Appends a closed history request recording who removed the link. The
/// request that originally formed the link is left untouched.
pub fn remove(
    tx: &Tx<'_>,
    remover: &ActorId,
    partner: &ActorId,
    now: u64,
) -> Result<Removal, ServiceError> {
    let not_found = || ServiceError::LinkNotFound(partner.clone());

    let pair = CanonicalPair::new(remover, partner).ok_or_else(not_found)?;
    let link = tx.link_for_pair(&pair)?.ok_or_else(not_found)?;
    if !tx.delete_link(link.id)? {
        return Err(not_found());
    }

    let history = StudyRequest::removal_record(remover.clone(), partner.clone(), now)
        .ok_or_else(not_found)?;
    tx.insert_request(&history)?;

    Ok(Removal { link, history })
}

/// Actors linked to `actor`, most recently linked first
pub fn partners_of(store: &SqliteStore, actor: &ActorId) -> Result<Vec<ActorId>, ServiceError> {
    Ok(store.partners_of(actor)?)
}

/// Look up the link for the unordered pair outside a transaction
pub fn link_for(
    store: &SqliteStore,
    a: &ActorId,
    b: &ActorId,
) -> Result<Option<StudyLink>, ServiceError> {
    match CanonicalPair::new(a, b) {
        Some(pair) => Ok(store.link_for_pair(&pair)?),
        None => Ok(None),
    }
}
