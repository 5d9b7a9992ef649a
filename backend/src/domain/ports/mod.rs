//! Domain ports for the hexagonal boundary.
//!
//! Driven ports ([`Geocoder`], [`UserRepository`], [`RegionRepository`]) are
//! implemented by outbound adapters; driving ports ([`UsersCommand`],
//! [`UsersQuery`], [`RegionsCommand`], [`RegionsQuery`]) are implemented by
//! the domain services and consumed by inbound adapters.

mod geocoder;
mod region_repository;
mod regions_api;
mod user_repository;
mod users_api;

#[cfg(test)]
pub use geocoder::MockGeocoder;
pub use geocoder::{Geocoder, GeocoderError, LatLng};
#[cfg(test)]
pub use region_repository::MockRegionRepository;
pub use region_repository::{RegionPersistenceError, RegionRepository};
#[cfg(test)]
pub use regions_api::{MockRegionsCommand, MockRegionsQuery};
pub use regions_api::{RegionsCommand, RegionsQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPatch, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_api::{MockUsersCommand, MockUsersQuery};
pub use users_api::{UsersCommand, UsersQuery};
