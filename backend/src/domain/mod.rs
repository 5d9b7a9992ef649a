//! Domain entities, ports, and services.
//!
//! Everything in this module is transport and storage agnostic. Inbound
//! adapters call the driving ports in [`ports`]; outbound adapters implement
//! the driven ports there. Services compose the two around the reconciliation
//! and reference-consistency rules.

pub mod error;
pub mod export;
pub mod geo;
pub mod id;
pub mod ports;
pub mod reconcile;
pub mod region;
pub mod regions;
pub mod spatial;
pub mod user;
pub mod users;

pub use self::error::{Error, ErrorCode};
pub use self::geo::{GeoPoint, GeoValidationError};
pub use self::id::{IdValidationError, RegionId, UserId};
pub use self::reconcile::{LocationInput, Reconciler, ResolvedLocation};
pub use self::region::{NewRegion, Region, RegionChanges};
pub use self::regions::RegionService;
pub use self::spatial::{NearbyQuery, SpatialFilter, SpatialPredicate};
pub use self::user::{NewUser, User, UserChanges};
pub use self::users::UserService;
