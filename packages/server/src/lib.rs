#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the accident map dashboard.
//!
//! Serves the REST API the dashboard frontend is built on: the district
//! selection, the heatmap, the comparison charts and the summary table,
//! all as JSON. The frontend's static files are served from the configured
//! directory (`app/dist` by default).
//!
//! The dataset is loaded once at startup and shared read-only between
//! workers. The selection is a single in-memory session guarded by a
//! mutex.

pub mod config;
mod handlers;
pub mod interactive;

use std::sync::{Arc, Mutex};

use accident_map_analytics::cache::AggregationCache;
use accident_map_database::Dataset;
use accident_map_selection::SelectionState;
use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};

use crate::config::DashboardConfig;

/// Shared application state.
pub struct AppState {
    /// Accident data, loaded once.
    pub dataset: Arc<Dataset>,
    /// Memoized aggregations over [`Self::dataset`].
    pub cache: Arc<AggregationCache>,
    /// Currently selected districts.
    pub selection: Mutex<SelectionState>,
    pub config: Arc<DashboardConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            cache: Arc::new(AggregationCache::new(config.cache_capacity)),
            selection: Mutex::new(SelectionState::default()),
            config: Arc::new(config),
        }
    }
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/options", web::get().to(handlers::options))
            .route("/selection", web::get().to(handlers::selection))
            .route("/selection/lasso", web::post().to(handlers::lasso))
            .route("/selection/add", web::post().to(handlers::add_district))
            .route("/selection/remove", web::post().to(handlers::remove_district))
            .route("/map", web::get().to(handlers::map))
            .route("/chart", web::get().to(handlers::chart))
            .route("/summary", web::get().to(handlers::summary)),
    );
}

/// Starts the accident map API server.
///
/// Loads the dataset from the configured paths and starts the Actix-Web
/// HTTP server on `BIND_ADDR`:`PORT` (default `127.0.0.1:8080`). This is a
/// regular async function; the caller provides the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the dataset cannot be loaded, or
/// if the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: DashboardConfig) -> std::io::Result<()> {
    log::info!("Loading dataset...");
    let dataset = Dataset::load(&config.data).map_err(|e| {
        log::error!("Failed to load dataset: {e}");
        std::io::Error::other(e)
    })?;
    log::info!(
        "Loaded {} districts, {} accident records, {} boundaries",
        dataset.registry().len(),
        dataset.records().len(),
        dataset.boundaries().len()
    );

    let static_dir = config.static_dir.clone();
    let state = web::Data::new(AppState::new(dataset, config));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Serve frontend static files (production)
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
