use async_trait::async_trait;
use contracts::domain::a001_location::{LocationId, LocationNode, LocationQuery};
use contracts::shared::location_hierarchy::LocationDirectory;

use crate::shared::api_utils::{get_json, with_query};

/// Справочник локаций поверх REST API backend (`/api/location/*`)
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpLocationDirectory;

impl HttpLocationDirectory {
    async fn fetch(&self, path: &str, query: LocationQuery) -> Result<Vec<LocationNode>, String> {
        let url = with_query(path, &query)?;
        get_json(&url).await
    }
}

#[async_trait(?Send)]
impl LocationDirectory for HttpLocationDirectory {
    async fn list_countries(&self) -> Result<Vec<LocationNode>, String> {
        get_json("/api/location/countries").await
    }

    async fn list_states(&self, country: Option<&LocationId>) -> Result<Vec<LocationNode>, String> {
        let query = LocationQuery {
            country_id: country.map(|c| c.0.clone()),
            ..Default::default()
        };
        self.fetch("/api/location/states", query).await
    }

    async fn list_clusters(&self, state: &LocationId) -> Result<Vec<LocationNode>, String> {
        let query = LocationQuery {
            state_id: Some(state.0.clone()),
            ..Default::default()
        };
        self.fetch("/api/location/clusters", query).await
    }

    async fn list_districts(&self, cluster: &LocationId) -> Result<Vec<LocationNode>, String> {
        let query = LocationQuery {
            cluster_id: Some(cluster.0.clone()),
            ..Default::default()
        };
        self.fetch("/api/location/districts", query).await
    }
}
