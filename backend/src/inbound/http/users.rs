//! User API handlers.
//!
//! ```text
//! POST   /api/v1/users
//! GET    /api/v1/users
//! GET    /api/v1/users/{userId}
//! PUT    /api/v1/users/{userId}
//! DELETE /api/v1/users/{userId}
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Error, GeoPoint, NewUser, User, UserChanges, UserId};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Create-user request body.
///
/// Exactly one of `address` and `coordinates` must be supplied; the missing
/// side is derived through geocoding.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    /// `[longitude, latitude]`
    #[serde(default)]
    #[schema(value_type = Option<Vec<f64>>)]
    pub coordinates: Option<GeoPoint>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            address: value.address,
            coordinates: value.coordinates,
        }
    }
}

/// Update-user request body; omitted fields are left untouched.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// `[longitude, latitude]`
    #[serde(default)]
    #[schema(value_type = Option<Vec<f64>>)]
    pub coordinates: Option<GeoPoint>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(value: UpdateUserRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            address: value.address,
            coordinates: value.coordinates,
        }
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| Error::invalid_input(format!("invalid user id: {err}")))
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = User),
        (status = 400, description = "Invalid input", body = Error),
        (status = 502, description = "Geocoder unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<web::Json<User>> {
    let user = state.users_command.create(payload.into_inner().into()).await?;
    Ok(web::Json(user))
}

/// List every user.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses((status = 200, description = "Users", body = [User])),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    Ok(web::Json(state.users_query.list().await?))
}

/// Fetch a single user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}",
    params(("userId" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{userId}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path)?;
    Ok(web::Json(state.users_query.fetch(&id).await?))
}

/// Apply a partial update to a user.
#[utoipa::path(
    put,
    path = "/api/v1/users/{userId}",
    params(("userId" = String, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Invalid input", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{userId}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path)?;
    let user = state
        .users_command
        .update(&id, payload.into_inner().into())
        .await?;
    Ok(web::Json(user))
}

/// Delete a user, returning the removed document.
///
/// Owned regions are left in place; their owner references dangle until the
/// regions themselves are deleted.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{userId}",
    params(("userId" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Deleted user", body = User),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{userId}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    let user = state.users_command.delete(&id).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockRegionsCommand, MockRegionsQuery, MockUsersCommand, MockUsersQuery,
    };
    use actix_web::{test as actix_test, App};
    use chrono::Utc;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn state(
        users_command: MockUsersCommand,
        users_query: MockUsersQuery,
    ) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            users_command: Arc::new(users_command),
            users_query: Arc::new(users_query),
            regions_command: Arc::new(MockRegionsCommand::new()),
            regions_query: Arc::new(MockRegionsQuery::new()),
        })
    }

    fn fixture_user() -> User {
        User {
            id: UserId::random(),
            name: "A".to_owned(),
            email: "a@example.com".to_owned(),
            address: Some("221B Baker St".to_owned()),
            coordinates: Some(GeoPoint::new(-0.15, 51.52).expect("valid point")),
            regions: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[actix_web::test]
    async fn create_user_returns_the_stored_document() {
        let mut command = MockUsersCommand::new();
        let created = fixture_user();
        let response_user = created.clone();
        command
            .expect_create()
            .withf(|new_user| {
                new_user.address.as_deref() == Some("221B Baker St")
                    && new_user.coordinates.is_none()
            })
            .times(1)
            .return_once(move |_| Ok(response_user));

        let app = actix_test::init_service(
            App::new()
                .app_data(state(command, MockUsersQuery::new()))
                .service(web::scope("/api/v1").service(create_user)),
        )
        .await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({
                "name": "A",
                "email": "a@example.com",
                "address": "221B Baker St"
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert!(response.status().is_success());

        let body: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("json body");
        assert_eq!(body.get("coordinates"), Some(&json!([-0.15, 51.52])));
        assert_eq!(body.get("id").and_then(Value::as_str), Some(created.id.as_ref()));
        assert!(body.get("createdAt").is_some());
    }

    #[actix_web::test]
    async fn create_user_surfaces_invalid_input_as_bad_request() {
        let mut command = MockUsersCommand::new();
        command
            .expect_create()
            .times(1)
            .return_once(|_| Err(Error::invalid_input("fill only address or coordinates")));

        let app = actix_test::init_service(
            App::new()
                .app_data(state(command, MockUsersQuery::new()))
                .service(web::scope("/api/v1").service(create_user)),
        )
        .await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({
                "name": "A",
                "email": "a@example.com",
                "address": "somewhere",
                "coordinates": [20.0, 10.0]
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let body: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("json body");
        assert_eq!(body.get("code"), Some(&json!("invalid_input")));
    }

    #[actix_web::test]
    async fn get_user_maps_missing_ids_to_not_found() {
        let mut query = MockUsersQuery::new();
        query
            .expect_fetch()
            .times(1)
            .return_once(|_| Err(Error::not_found("user not found")));

        let app = actix_test::init_service(
            App::new()
                .app_data(state(MockUsersCommand::new(), query))
                .service(web::scope("/api/v1").service(get_user)),
        )
        .await;

        let request = actix_test::TestRequest::get()
            .uri(&format!("/api/v1/users/{}", UserId::random()))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn malformed_user_ids_are_rejected_without_reaching_the_service() {
        let mut query = MockUsersQuery::new();
        query.expect_fetch().times(0);

        let app = actix_test::init_service(
            App::new()
                .app_data(state(MockUsersCommand::new(), query))
                .service(web::scope("/api/v1").service(get_user)),
        )
        .await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/users/not-a-uuid")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn update_user_passes_partial_changes_through() {
        let id = UserId::random();
        let expected = id.clone();
        let mut command = MockUsersCommand::new();
        let updated = fixture_user();
        command
            .expect_update()
            .withf(move |called_id, changes| {
                *called_id == expected
                    && changes.name.as_deref() == Some("B")
                    && changes.address.is_none()
                    && changes.coordinates.is_none()
            })
            .times(1)
            .return_once(move |_, _| Ok(updated));

        let app = actix_test::init_service(
            App::new()
                .app_data(state(command, MockUsersQuery::new()))
                .service(web::scope("/api/v1").service(update_user)),
        )
        .await;

        let request = actix_test::TestRequest::put()
            .uri(&format!("/api/v1/users/{id}"))
            .set_json(json!({ "name": "B" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert!(response.status().is_success());
    }
}
