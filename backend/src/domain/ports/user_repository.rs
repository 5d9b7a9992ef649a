//! Port for user persistence adapters.

use async_trait::async_trait;

use crate::domain::id::{RegionId, UserId};
use crate::domain::reconcile::ResolvedLocation;
use crate::domain::user::User;

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
}

impl UserPersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Field-level changes applied as one partial update.
///
/// `location` carries the reconciled address/coordinates pair; a populated
/// location with `coordinates: None` unsets the stored coordinates rather
/// than leaving a stale derivation behind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub location: Option<ResolvedLocation>,
}

/// Port for user storage and the denormalised region back-references.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a freshly created user.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Cheap existence probe used as the region-creation precondition.
    async fn exists(&self, id: &UserId) -> Result<bool, UserPersistenceError>;

    /// Fetch every user.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Apply a partial update, returning the updated user when it exists.
    async fn update(
        &self,
        id: &UserId,
        patch: UserPatch,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Delete a user, returning the removed document when it existed.
    async fn delete(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Add a region id to the user's owned set.
    ///
    /// Set-union semantics: adding an already-present id is a no-op, not an
    /// error.
    async fn attach_region(
        &self,
        id: &UserId,
        region: &RegionId,
    ) -> Result<(), UserPersistenceError>;

    /// Remove a region id from every user's owned set it appears in,
    /// returning how many users changed.
    ///
    /// Scanning every user rather than the nominal owner lets the delete
    /// path repair reference drift.
    async fn detach_region_from_all(
        &self,
        region: &RegionId,
    ) -> Result<u64, UserPersistenceError>;
}
