//! Driving ports for user operations, consumed by inbound adapters.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::id::UserId;
use crate::domain::user::{NewUser, User, UserChanges};

/// Mutating user operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Create a user, deriving the missing geo field.
    async fn create(&self, new_user: NewUser) -> Result<User, Error>;

    /// Apply a partial update, re-deriving geo fields when either changes.
    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, Error>;

    /// Delete a user, returning the removed document.
    async fn delete(&self, id: &UserId) -> Result<User, Error>;
}

/// Read-only user operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch every user.
    async fn list(&self) -> Result<Vec<User>, Error>;

    /// Fetch a user by identifier.
    async fn fetch(&self, id: &UserId) -> Result<User, Error>;
}
