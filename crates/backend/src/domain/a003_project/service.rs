use contracts::domain::a001_location::{LocationQuery, LocationSelection, LocationTier};
use contracts::domain::a003_project::{Project, ProjectStatus};
use thiserror::Error;
use uuid::Uuid;

use super::repository::{self, LocationFilter};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectQueryError {
    /// Уровень, который в записи проекта не хранится
    #[error("Projects cannot be filtered by {0}")]
    UnsupportedTier(LocationTier),
}

/// Проекты в пределах выбранной локации
pub async fn list(query: &LocationQuery) -> anyhow::Result<Vec<Project>> {
    let selection = query.to_selection();
    let filter = location_filter(&selection)?;
    repository::list_by_location(filter).await
}

/// Страна в записи проекта не хранится. Фильтр движка на клиенте в этом
/// случае не пропустил бы ни одной записи, поэтому country_id отклоняется,
/// а не игнорируется.
fn location_filter(selection: &LocationSelection) -> Result<LocationFilter<'_>, ProjectQueryError> {
    if selection.get(LocationTier::Country).is_some() {
        return Err(ProjectQueryError::UnsupportedTier(LocationTier::Country));
    }
    Ok(LocationFilter {
        state_id: selection.get(LocationTier::State).map(|id| id.as_str()),
        cluster_id: selection.get(LocationTier::Cluster).map(|id| id.as_str()),
        district_id: selection.get(LocationTier::District).map(|id| id.as_str()),
    })
}

/// (клиент, мощность кВт, статус, штат, кластер, район)
const DEMO_PROJECTS: &[(&str, f64, ProjectStatus, &str, &str, Option<&str>)] = &[
    ("Patel Residence", 5.0, ProjectStatus::Commissioned, "GJ", "GJ-AHD", Some("GJ-AHD-SND")),
    ("Sanand Auto Parts", 120.0, ProjectStatus::Installation, "GJ", "GJ-AHD", Some("GJ-AHD-SND")),
    ("Daskroi Cold Storage", 60.0, ProjectStatus::Survey, "GJ", "GJ-AHD", Some("GJ-AHD-DSK")),
    ("Olpad Textiles", 250.0, ProjectStatus::Lead, "GJ", "GJ-SRT", Some("GJ-SRT-OLP")),
    ("Choryasi School", 30.0, ProjectStatus::Commissioned, "GJ", "GJ-SRT", Some("GJ-SRT-CHR")),
    ("Sharma Villa", 8.0, ProjectStatus::Cancelled, "RJ", "RJ-JPR", Some("RJ-JPR-SNG")),
    ("Amber Fort Hotel", 90.0, ProjectStatus::Installation, "RJ", "RJ-JPR", Some("RJ-JPR-AMB")),
    ("Jodhpur Dairy", 45.0, ProjectStatus::Survey, "RJ", "RJ-JDH", None),
    ("Haveli Warehouse", 150.0, ProjectStatus::Lead, "MH", "MH-PNE", Some("MH-PNE-HVL")),
    ("Mulshi Resort", 75.0, ProjectStatus::Commissioned, "MH", "MH-PNE", Some("MH-PNE-MLS")),
];

pub fn demo_projects() -> Vec<Project> {
    DEMO_PROJECTS
        .iter()
        .enumerate()
        .map(|(i, (customer, capacity_kw, status, state, cluster, district))| Project {
            id: Uuid::new_v4().to_string(),
            code: format!("PRJ-{:04}", i + 1),
            customer: customer.to_string(),
            capacity_kw: *capacity_kw,
            status: *status,
            state_id: state.to_string(),
            cluster_id: cluster.to_string(),
            district_id: district.map(str::to_string),
        })
        .collect()
}

/// Вставка тестовых данных
pub async fn insert_test_data() -> anyhow::Result<()> {
    for project in demo_projects() {
        repository::insert(&project).await?;
    }
    Ok(())
}

pub async fn seed_if_empty() -> anyhow::Result<bool> {
    if repository::count_all().await? > 0 {
        return Ok(false);
    }
    insert_test_data().await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::faceted_filter::Locatable;

    #[test]
    fn test_country_scope_is_rejected() {
        let query = LocationQuery {
            country_id: Some("IN".into()),
            state_id: Some("GJ".into()),
            ..Default::default()
        };
        assert_eq!(
            location_filter(&query.to_selection()).err(),
            Some(ProjectQueryError::UnsupportedTier(LocationTier::Country))
        );
    }

    #[test]
    fn test_location_filter_from_query() {
        let query = LocationQuery {
            country_id: Some(" ".into()),
            state_id: Some("GJ".into()),
            cluster_id: Some("GJ-AHD".into()),
            ..Default::default()
        };
        let selection = query.to_selection();
        let filter = location_filter(&selection).unwrap();
        assert_eq!(filter.state_id, Some("GJ"));
        assert_eq!(filter.cluster_id, Some("GJ-AHD"));
        assert_eq!(filter.district_id, None);
    }

    #[test]
    fn test_demo_projects_have_district_inside_cluster() {
        for p in demo_projects() {
            if let Some(district) = &p.district_id {
                assert!(district.starts_with(&p.cluster_id), "{}", p.customer);
            }
            assert!(p.cluster_id.starts_with(&p.state_id), "{}", p.customer);
        }
    }

    #[test]
    fn test_demo_projects_scoped_by_cluster() {
        let scope = LocationSelection {
            state: Some("GJ".into()),
            cluster: Some("GJ-AHD".into()),
            ..Default::default()
        };
        let count = demo_projects()
            .iter()
            .filter(|p| scope.matches(|tier| p.location_id(tier)))
            .count();
        assert_eq!(count, 3);
    }
}
