//! Backend entry-point: wires storage, geocoding, and the REST endpoints.

use std::env;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use backend::domain::{RegionService, UserService};
use backend::inbound::http::health::{live, ready, HealthState};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{regions, users};
use backend::outbound::geocoding::MapsCoGeocoder;
use backend::outbound::persistence::{
    connect, ensure_indexes, MongoRegionRepository, MongoUserRepository,
};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_GEOCODER_TIMEOUT_SECONDS: u64 = 10;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let mongo_uri =
        env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://127.0.0.1:27017".into());
    let mongo_database = env::var("MONGODB_DATABASE").unwrap_or_else(|_| "regions".into());
    let geocoder_base =
        env::var("GEOCODER_BASE_URL").unwrap_or_else(|_| "https://geocode.maps.co".into());
    let geocoder_key = env::var("GEOCODER_API_KEY").unwrap_or_default();
    let geocoder_timeout = env::var("GEOCODER_TIMEOUT_SECONDS")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_GEOCODER_TIMEOUT_SECONDS);
    let port = env::var("PORT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let database = connect(&mongo_uri, &mongo_database)
        .await
        .map_err(|e| io::Error::other(format!("mongodb bootstrap failed: {e}")))?;
    ensure_indexes(&database)
        .await
        .map_err(|e| io::Error::other(format!("mongodb index creation failed: {e}")))?;

    let geocoder_url = Url::parse(&geocoder_base)
        .map_err(|e| io::Error::other(format!("invalid GEOCODER_BASE_URL: {e}")))?;
    let geocoder = Arc::new(
        MapsCoGeocoder::with_timeout(
            geocoder_url,
            geocoder_key,
            Duration::from_secs(geocoder_timeout),
        )
        .map_err(|e| io::Error::other(format!("failed to build geocoder client: {e}")))?,
    );

    let user_repo = Arc::new(MongoUserRepository::new(&database));
    let region_repo = Arc::new(MongoRegionRepository::new(&database));
    let user_service = Arc::new(UserService::new(user_repo.clone(), geocoder));
    let region_service = Arc::new(RegionService::new(region_repo, user_repo));

    let state = HttpState {
        users_command: user_service.clone(),
        users_query: user_service,
        regions_command: region_service.clone(),
        regions_query: region_service,
    };

    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        // `search` and `export` register ahead of the `{regionId}` matcher.
        let api = web::scope("/api/v1")
            .app_data(web::Data::new(state.clone()))
            .service(users::create_user)
            .service(users::list_users)
            .service(users::get_user)
            .service(users::update_user)
            .service(users::delete_user)
            .service(regions::search_regions)
            .service(regions::export_regions)
            .service(regions::create_region)
            .service(regions::list_regions)
            .service(regions::get_region)
            .service(regions::update_region)
            .service(regions::delete_region);

        App::new()
            .app_data(server_health_state.clone())
            .service(api)
            .service(ready)
            .service(live)
    })
    .bind(("0.0.0.0", port))?;

    health_state.mark_ready();
    let outcome = server.run().await;

    // Explicit driver shutdown so pooled connections close before exit.
    database.client().clone().shutdown().await;
    outcome
}
