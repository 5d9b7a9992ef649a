//! MongoDB connection bootstrap and shared error classification.

use mongodb::bson::doc;
use mongodb::error::ErrorKind;
use mongodb::{Client, Database, IndexModel};
use tracing::info;

use super::documents::RegionDocument;

/// Name of the users collection.
pub const USERS_COLLECTION: &str = "users";
/// Name of the regions collection.
pub const REGIONS_COLLECTION: &str = "regions";

/// Connect to MongoDB and verify the deployment answers a ping.
///
/// # Errors
///
/// Returns the driver error when the URI is malformed or the deployment is
/// unreachable.
pub async fn connect(uri: &str, database: &str) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(uri).await?;
    let db = client.database(database);
    db.run_command(doc! { "ping": 1 }).await?;
    info!(database, "connected to MongoDB");
    Ok(db)
}

/// Create the geospatial index region search relies on.
///
/// # Errors
///
/// Returns the driver error when index creation fails.
pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let regions = db.collection::<RegionDocument>(REGIONS_COLLECTION);
    regions
        .create_index(
            IndexModel::builder()
                .keys(doc! { "coordinates": "2dsphere" })
                .build(),
        )
        .await?;
    Ok(())
}

/// Whether a driver error means the deployment itself is unreachable, as
/// opposed to a failed query.
pub(super) fn is_connection_error(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::ServerSelection { .. } | ErrorKind::ConnectionPoolCleared { .. } | ErrorKind::Io(_)
    )
}
