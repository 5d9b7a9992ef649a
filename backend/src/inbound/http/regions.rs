//! Region API handlers.
//!
//! ```text
//! POST   /api/v1/regions
//! GET    /api/v1/regions
//! GET    /api/v1/regions/search
//! GET    /api/v1/regions/export
//! GET    /api/v1/regions/{regionId}
//! PUT    /api/v1/regions/{regionId}
//! DELETE /api/v1/regions/{regionId}
//! ```
//!
//! `search` and `export` must be registered ahead of the `{regionId}`
//! matcher.

use actix_web::{delete, get, http::header, post, put, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{
    Error, GeoPoint, NearbyQuery, NewRegion, Region, RegionChanges, RegionId, UserId,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Create-region request body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegionRequest {
    pub name: String,
    /// `[longitude, latitude]`
    #[schema(value_type = Vec<f64>)]
    pub coordinates: GeoPoint,
    /// Identifier of the owning user; must already exist.
    pub owner_id: String,
}

/// Update-region request body; ownership cannot change.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegionRequest {
    #[serde(default)]
    pub name: Option<String>,
    /// `[longitude, latitude]`
    #[serde(default)]
    #[schema(value_type = Option<Vec<f64>>)]
    pub coordinates: Option<GeoPoint>,
}

impl From<UpdateRegionRequest> for RegionChanges {
    fn from(value: UpdateRegionRequest) -> Self {
        Self {
            name: value.name,
            coordinates: value.coordinates,
        }
    }
}

/// Nearby-search query string.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub lat: f64,
    pub lng: f64,
    /// Maximum distance in meters; omitted means exact point intersection.
    #[serde(default)]
    pub distance: Option<f64>,
    /// Owner whose regions are excluded from the results.
    #[serde(default)]
    pub owner_id: Option<String>,
}

fn parse_region_id(raw: &str) -> Result<RegionId, Error> {
    RegionId::new(raw).map_err(|err| Error::invalid_input(format!("invalid region id: {err}")))
}

fn parse_owner_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| Error::invalid_input(format!("invalid owner id: {err}")))
}

/// Create a region for an existing owner.
#[utoipa::path(
    post,
    path = "/api/v1/regions",
    request_body = CreateRegionRequest,
    responses(
        (status = 200, description = "Region created", body = Region),
        (status = 400, description = "Invalid input", body = Error),
        (status = 404, description = "Unknown owner", body = Error)
    ),
    tags = ["regions"],
    operation_id = "createRegion"
)]
#[post("/regions")]
pub async fn create_region(
    state: web::Data<HttpState>,
    payload: web::Json<CreateRegionRequest>,
) -> ApiResult<web::Json<Region>> {
    let payload = payload.into_inner();
    let new_region = NewRegion {
        name: payload.name,
        coordinates: payload.coordinates,
        owner: parse_owner_id(&payload.owner_id)?,
    };
    Ok(web::Json(state.regions_command.create(new_region).await?))
}

/// List every region.
#[utoipa::path(
    get,
    path = "/api/v1/regions",
    responses((status = 200, description = "Regions", body = [Region])),
    tags = ["regions"],
    operation_id = "listRegions"
)]
#[get("/regions")]
pub async fn list_regions(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Region>>> {
    Ok(web::Json(state.regions_query.list().await?))
}

/// Search regions near or at a point.
///
/// With `distance` the store's near operator applies and results come back
/// nearest first; without it the query degrades to point intersection.
#[utoipa::path(
    get,
    path = "/api/v1/regions/search",
    params(
        ("lat" = f64, Query, description = "Query point latitude"),
        ("lng" = f64, Query, description = "Query point longitude"),
        ("distance" = Option<f64>, Query, description = "Maximum distance in meters"),
        ("ownerId" = Option<String>, Query, description = "Owner to exclude from results")
    ),
    responses(
        (status = 200, description = "Matching regions", body = [Region]),
        (status = 400, description = "Invalid input", body = Error)
    ),
    tags = ["regions"],
    operation_id = "searchRegions"
)]
#[get("/regions/search")]
pub async fn search_regions(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<Region>>> {
    let SearchParams {
        lat,
        lng,
        distance,
        owner_id,
    } = params.into_inner();
    let exclude_owner = owner_id
        .as_deref()
        .map(parse_owner_id)
        .transpose()?;
    let query = NearbyQuery {
        latitude: lat,
        longitude: lng,
        distance,
        exclude_owner,
    };
    Ok(web::Json(state.regions_query.search(query).await?))
}

/// Download every region as CSV.
#[utoipa::path(
    get,
    path = "/api/v1/regions/export",
    responses(
        (status = 200, description = "CSV export of all regions", content_type = "text/csv")
    ),
    tags = ["regions"],
    operation_id = "exportRegions"
)]
#[get("/regions/export")]
pub async fn export_regions(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let body = state.regions_query.export_csv().await?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"regions.csv\"",
        ))
        .body(body))
}

/// Fetch a single region.
#[utoipa::path(
    get,
    path = "/api/v1/regions/{regionId}",
    params(("regionId" = String, Path, description = "Region identifier")),
    responses(
        (status = 200, description = "Region", body = Region),
        (status = 404, description = "Unknown region", body = Error)
    ),
    tags = ["regions"],
    operation_id = "getRegion"
)]
#[get("/regions/{regionId}")]
pub async fn get_region(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Region>> {
    let id = parse_region_id(&path)?;
    Ok(web::Json(state.regions_query.fetch(&id).await?))
}

/// Apply a partial update to a region.
#[utoipa::path(
    put,
    path = "/api/v1/regions/{regionId}",
    params(("regionId" = String, Path, description = "Region identifier")),
    request_body = UpdateRegionRequest,
    responses(
        (status = 200, description = "Updated region", body = Region),
        (status = 404, description = "Unknown region", body = Error)
    ),
    tags = ["regions"],
    operation_id = "updateRegion"
)]
#[put("/regions/{regionId}")]
pub async fn update_region(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateRegionRequest>,
) -> ApiResult<web::Json<Region>> {
    let id = parse_region_id(&path)?;
    let region = state
        .regions_command
        .update(&id, payload.into_inner().into())
        .await?;
    Ok(web::Json(region))
}

/// Delete a region and scrub its back-references.
#[utoipa::path(
    delete,
    path = "/api/v1/regions/{regionId}",
    params(("regionId" = String, Path, description = "Region identifier")),
    responses(
        (status = 200, description = "Deleted region", body = Region),
        (status = 404, description = "Unknown region", body = Error)
    ),
    tags = ["regions"],
    operation_id = "deleteRegion"
)]
#[delete("/regions/{regionId}")]
pub async fn delete_region(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Region>> {
    let id = parse_region_id(&path)?;
    Ok(web::Json(state.regions_command.delete(&id).await?))
}
