//! MongoDB persistence adapters implementing the repository ports.

mod documents;
mod mongo;
mod mongo_region_repository;
mod mongo_user_repository;

pub use documents::{RegionDocument, UserDocument};
pub use mongo::{connect, ensure_indexes, REGIONS_COLLECTION, USERS_COLLECTION};
pub use mongo_region_repository::MongoRegionRepository;
pub use mongo_user_repository::MongoUserRepository;
