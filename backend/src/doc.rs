//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use crate::domain::{Error, Region, User};
use crate::inbound::http::{health, regions, users};

/// Aggregated OpenAPI description served to tooling.
#[derive(OpenApi)]
#[openapi(
    paths(
        users::create_user,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        regions::create_region,
        regions::list_regions,
        regions::search_regions,
        regions::export_regions,
        regions::get_region,
        regions::update_region,
        regions::delete_region,
        health::live,
        health::ready,
    ),
    components(schemas(
        Error,
        User,
        Region,
        users::CreateUserRequest,
        users::UpdateUserRequest,
        regions::CreateRegionRequest,
        regions::UpdateRegionRequest,
    )),
    tags(
        (name = "users", description = "User management"),
        (name = "regions", description = "Geofenced region management and search"),
        (name = "health", description = "Probes"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/users"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/regions/search"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/regions/export"));
        assert!(paths.iter().any(|p| p.as_str() == "/health/ready"));
    }
}
