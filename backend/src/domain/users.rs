//! User orchestration service.
//!
//! Reconciliation is an explicit service step rather than a persistence
//! hook: lookups run before any write, so their failures surface to the
//! caller in order.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::error::Error;
use crate::domain::id::UserId;
use crate::domain::ports::{
    Geocoder, UserPatch, UserPersistenceError, UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::reconcile::{LocationInput, Reconciler};
use crate::domain::user::{NewUser, User, UserChanges};

/// User service implementing the driving ports.
#[derive(Clone)]
pub struct UserService<R, G> {
    repo: Arc<R>,
    reconciler: Reconciler<G>,
}

impl<R, G> UserService<R, G> {
    /// Create a service over a user repository and a geocoder.
    pub fn new(repo: Arc<R>, geocoder: Arc<G>) -> Self {
        Self {
            repo,
            reconciler: Reconciler::new(geocoder),
        }
    }
}

impl<R, G> UserService<R, G>
where
    R: UserRepository,
    G: Geocoder,
{
    fn map_repo_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
        }
    }

    fn missing() -> Error {
        Error::not_found("user not found")
    }
}

#[async_trait]
impl<R, G> UsersCommand for UserService<R, G>
where
    R: UserRepository,
    G: Geocoder,
{
    async fn create(&self, new_user: NewUser) -> Result<User, Error> {
        let input = LocationInput::for_create(new_user.address, new_user.coordinates)?;
        let location = self.reconciler.resolve(input).await?;

        let now = Utc::now();
        let user = User {
            id: UserId::random(),
            name: new_user.name,
            email: new_user.email,
            address: location.address,
            coordinates: location.coordinates,
            regions: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.repo.insert(&user).await.map_err(Self::map_repo_error)?;
        Ok(user)
    }

    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, Error> {
        let location = match LocationInput::for_update(changes.address, changes.coordinates)? {
            Some(input) => Some(self.reconciler.resolve(input).await?),
            None => None,
        };

        let patch = UserPatch {
            name: changes.name,
            email: changes.email,
            location,
        };
        self.repo
            .update(id, patch)
            .await
            .map_err(Self::map_repo_error)?
            .ok_or_else(Self::missing)
    }

    async fn delete(&self, id: &UserId) -> Result<User, Error> {
        // Owned regions keep their owner reference; region deletion's
        // defensive scrub is the repair path for the dangling side.
        self.repo
            .delete(id)
            .await
            .map_err(Self::map_repo_error)?
            .ok_or_else(Self::missing)
    }
}

#[async_trait]
impl<R, G> UsersQuery for UserService<R, G>
where
    R: UserRepository,
    G: Geocoder,
{
    async fn list(&self) -> Result<Vec<User>, Error> {
        self.repo.list().await.map_err(Self::map_repo_error)
    }

    async fn fetch(&self, id: &UserId) -> Result<User, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(Self::map_repo_error)?
            .ok_or_else(Self::missing)
    }
}
