use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // A001 Location directory
        // ========================================
        .route(
            "/api/location",
            post(handlers::a001_location::upsert),
        )
        .route(
            "/api/location/countries",
            get(handlers::a001_location::list_countries),
        )
        .route(
            "/api/location/states",
            get(handlers::a001_location::list_states),
        )
        .route(
            "/api/location/clusters",
            get(handlers::a001_location::list_clusters),
        )
        .route(
            "/api/location/districts",
            get(handlers::a001_location::list_districts),
        )
        .route(
            "/api/location/testdata",
            post(handlers::a001_location::insert_test_data),
        )
        .route(
            "/api/location/:id",
            get(handlers::a001_location::get_by_id).delete(handlers::a001_location::deactivate),
        )
        // ========================================
        // A002 Suppliers
        // ========================================
        .route("/api/supplier", get(handlers::a002_supplier::list_all))
        .route(
            "/api/supplier/facets",
            get(handlers::a002_supplier::facets),
        )
        .route(
            "/api/supplier/testdata",
            post(handlers::a002_supplier::insert_test_data),
        )
        // ========================================
        // A003 Projects
        // ========================================
        .route("/api/project", get(handlers::a003_project::list))
        .route(
            "/api/project/testdata",
            post(handlers::a003_project::insert_test_data),
        )
}
