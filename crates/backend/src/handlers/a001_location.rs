use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_location::{LocationNode, LocationNodeDto, LocationQuery, LocationTier};
use serde_json::json;

use crate::domain::a001_location::service::{self, LocationAdminError};

/// Ошибки администрирования - 4xx, всё остальное - 500 с записью в лог
fn error_status(e: &anyhow::Error) -> StatusCode {
    match e.downcast_ref::<LocationAdminError>() {
        Some(LocationAdminError::Validation(_)) | Some(LocationAdminError::Cycle(_)) => {
            StatusCode::BAD_REQUEST
        }
        Some(LocationAdminError::ParentNotFound(_)) | Some(LocationAdminError::NotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        Some(LocationAdminError::HasActiveChildren { .. }) => StatusCode::CONFLICT,
        None => {
            tracing::error!("Location request failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

async fn list(
    tier: LocationTier,
    parent: Option<String>,
) -> Result<Json<Vec<LocationNode>>, StatusCode> {
    let parent = parent.as_deref().map(str::trim).filter(|p| !p.is_empty());
    match service::list_children(tier, parent).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::warn!("Failed to list {}: {}", tier, e);
            Err(error_status(&e))
        }
    }
}

/// GET /api/location/countries
pub async fn list_countries() -> Result<Json<Vec<LocationNode>>, StatusCode> {
    list(LocationTier::Country, None).await
}

/// GET /api/location/states?country_id=
pub async fn list_states(
    Query(query): Query<LocationQuery>,
) -> Result<Json<Vec<LocationNode>>, StatusCode> {
    list(LocationTier::State, query.country_id).await
}

/// GET /api/location/clusters?state_id=
pub async fn list_clusters(
    Query(query): Query<LocationQuery>,
) -> Result<Json<Vec<LocationNode>>, StatusCode> {
    list(LocationTier::Cluster, query.state_id).await
}

/// GET /api/location/districts?cluster_id=
pub async fn list_districts(
    Query(query): Query<LocationQuery>,
) -> Result<Json<Vec<LocationNode>>, StatusCode> {
    list(LocationTier::District, query.cluster_id).await
}

/// GET /api/location/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<LocationNode>, StatusCode> {
    match service::get_by_id(&id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(error_status(&e)),
    }
}

/// POST /api/location
pub async fn upsert(
    Json(dto): Json<LocationNodeDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    match service::upsert(dto).await {
        Ok(id) => Ok(Json(json!({ "id": id }))),
        Err(e) => {
            tracing::warn!("Failed to save location: {}", e);
            Err(error_status(&e))
        }
    }
}

/// DELETE /api/location/:id
pub async fn deactivate(Path(id): Path<String>) -> Result<(), StatusCode> {
    service::deactivate(&id).await.map_err(|e| {
        tracing::warn!("Failed to deactivate location {}: {}", id, e);
        error_status(&e)
    })
}

/// POST /api/location/testdata
pub async fn insert_test_data() -> StatusCode {
    match service::insert_test_data().await {
        Ok(_) => StatusCode::OK,
        Err(e) => error_status(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_errors_map_to_client_statuses() {
        let cases = [
            (LocationAdminError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (LocationAdminError::Cycle("GJ".into()), StatusCode::BAD_REQUEST),
            (LocationAdminError::ParentNotFound("GJ".into()), StatusCode::NOT_FOUND),
            (LocationAdminError::NotFound("GJ".into()), StatusCode::NOT_FOUND),
            (
                LocationAdminError::HasActiveChildren {
                    id: "GJ".into(),
                    count: 2,
                },
                StatusCode::CONFLICT,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(error_status(&anyhow::Error::new(err)), status);
        }
        assert_eq!(
            error_status(&anyhow::anyhow!("disk full")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
