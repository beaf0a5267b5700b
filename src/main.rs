// src/main.rs

use std::env;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::{Pool, Postgres};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

mod db;
mod error;
mod extractors;
mod models;
mod reports;
mod routes;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool<Postgres>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize DB pool
    let pool = db::connect().await?;
    let state = AppState { pool };

    // Very permissive CORS for local dev (tighten for prod)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Root API router
    let api = Router::new()
        // health
        .route("/health", get(routes::health::health))
        // home: occupancy summaries
        .route(
            "/api/home/GetAllSitesInfo",
            get(routes::home::get_all_sites_info),
        )
        .route(
            "/api/home/GetIndiaAndOverseasCounts",
            get(routes::home::get_india_and_overseas_counts),
        )
        .route(
            "/api/home/EmployeeCountBySite",
            get(routes::home::employee_count_by_site),
        )
        // location: access reports
        .route(
            "/api/location/GetLocationWiseEmployeeCount",
            post(routes::location::get_location_wise_employee_count),
        )
        .route(
            "/api/location/get-branch-and-employee-data-day-wise",
            post(routes::location::get_branch_and_employee_data_day_wise),
        )
        .route(
            "/api/location/get-hour-wise-employee-count",
            post(routes::location::get_hour_wise_employee_count),
        )
        // reader: device health
        .route(
            "/api/reader/controllersAndReadersBySite",
            get(routes::reader::controllers_and_readers_by_site),
        )
        // state & middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Port (axum 0.7 style)
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;

    println!("🚀 API listening on http://127.0.0.1:{port}");

    axum::serve(listener, api.into_make_service()).await?;
    Ok(())
}
