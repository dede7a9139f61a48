//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, migrations, service wiring and the Axum
//! server lifecycle.

use crate::application::services::{BundleService, CourseService, LookupService, ProgramService};
use crate::config::{Config, PoolSettings};
use crate::infrastructure::persistence::{
    PgBundleRepository, PgCourseRepository, PgLookupRepository, PgMediaLookup,
    PgProgramRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

/// Opens the PostgreSQL pool using the configured limits.
pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.idle_timeout)
        .max_lifetime(settings.max_lifetime)
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Wires repositories and services around a pool.
pub fn build_state(pool: PgPool, default_page_size: u32) -> AppState {
    let pool = Arc::new(pool);

    let lookup_repository = Arc::new(PgLookupRepository::new(pool.clone()));
    let course_repository = Arc::new(PgCourseRepository::new(pool.clone()));
    let bundle_repository = Arc::new(PgBundleRepository::new(pool.clone()));
    let program_repository = Arc::new(PgProgramRepository::new(pool.clone()));
    let media_lookup = Arc::new(PgMediaLookup::new(pool));

    let lookup_service = Arc::new(LookupService::new(lookup_repository.clone()));
    let course_service = Arc::new(CourseService::new(
        course_repository,
        lookup_repository,
        media_lookup,
    ));
    let bundle_service = Arc::new(BundleService::new(
        bundle_repository,
        course_service.clone(),
    ));
    let program_service = Arc::new(ProgramService::new(
        program_repository,
        course_service.clone(),
    ));

    AppState {
        lookup_service,
        course_service,
        bundle_service,
        program_service,
        default_page_size,
    }
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect(&config.database_url, &config.pool).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    let state = build_state(pool, config.default_page_size);
    let app = app_router(state);

    let addr = config.listen_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
