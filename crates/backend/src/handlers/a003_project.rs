use axum::{extract::Query, http::StatusCode, Json};
use contracts::domain::a001_location::LocationQuery;
use contracts::domain::a003_project::Project;

use crate::domain::a003_project;
use crate::domain::a003_project::service::ProjectQueryError;

/// GET /api/project?state_id=&cluster_id=&district_id=
pub async fn list(Query(query): Query<LocationQuery>) -> Result<Json<Vec<Project>>, StatusCode> {
    match a003_project::service::list(&query).await {
        Ok(v) => Ok(Json(v)),
        Err(e) if e.downcast_ref::<ProjectQueryError>().is_some() => {
            tracing::warn!("Bad project query: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(e) => {
            tracing::error!("Failed to list projects: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/project/testdata
pub async fn insert_test_data() -> StatusCode {
    match a003_project::service::insert_test_data().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::error!("Failed to insert project test data: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
