use axum::{extract::Query, http::StatusCode, Json};
use contracts::domain::a002_supplier::Supplier;
use contracts::shared::errors::FilterError;
use contracts::shared::faceted_filter::{FacetOptionsResponse, FacetSelectionQuery};

use crate::domain::a002_supplier;

/// GET /api/supplier
pub async fn list_all() -> Result<Json<Vec<Supplier>>, StatusCode> {
    match a002_supplier::service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list suppliers: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/supplier/facets?state_id=GJ&facet.product=Inverter
pub async fn facets(
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<FacetOptionsResponse>, StatusCode> {
    let query = FacetSelectionQuery::from_pairs(pairs);
    match a002_supplier::service::facets(&query).await {
        Ok(v) => Ok(Json(v)),
        Err(e) if matches!(e.downcast_ref::<FilterError>(), Some(FilterError::UnknownFacet(_))) => {
            tracing::warn!("Bad facet request: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(e) => {
            tracing::error!("Failed to compute supplier facets: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/supplier/testdata
pub async fn insert_test_data() -> StatusCode {
    match a002_supplier::service::insert_test_data().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::error!("Failed to insert supplier test data: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
