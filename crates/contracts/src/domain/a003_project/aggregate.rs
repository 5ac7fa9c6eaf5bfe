use serde::{Deserialize, Serialize};

use crate::domain::a001_location::LocationTier;
use crate::shared::faceted_filter::{Facet, Locatable};

/// Статус проекта установки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Lead,
    Survey,
    Installation,
    Commissioned,
    Cancelled,
}

impl ProjectStatus {
    pub fn code(&self) -> &'static str {
        match self {
            ProjectStatus::Lead => "lead",
            ProjectStatus::Survey => "survey",
            ProjectStatus::Installation => "installation",
            ProjectStatus::Commissioned => "commissioned",
            ProjectStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectStatus::Lead => "Лид",
            ProjectStatus::Survey => "Обследование",
            ProjectStatus::Installation => "Монтаж",
            ProjectStatus::Commissioned => "Введён в эксплуатацию",
            ProjectStatus::Cancelled => "Отменён",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "lead" => Some(ProjectStatus::Lead),
            "survey" => Some(ProjectStatus::Survey),
            "installation" => Some(ProjectStatus::Installation),
            "commissioned" => Some(ProjectStatus::Commissioned),
            "cancelled" => Some(ProjectStatus::Cancelled),
            _ => None,
        }
    }
}

/// Проект солнечной установки у клиента
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub code: String,
    pub customer: String,
    #[serde(rename = "capacityKw")]
    pub capacity_kw: f64,
    pub status: ProjectStatus,
    #[serde(rename = "stateId")]
    pub state_id: String,
    #[serde(rename = "clusterId")]
    pub cluster_id: String,
    #[serde(rename = "districtId")]
    pub district_id: Option<String>,
}

impl Locatable for Project {
    fn location_id(&self, tier: LocationTier) -> Option<&str> {
        match tier {
            LocationTier::Country => None,
            LocationTier::State => Some(self.state_id.as_str()),
            LocationTier::Cluster => Some(self.cluster_id.as_str()),
            LocationTier::District => self.district_id.as_deref(),
        }
    }
}

/// Фасеты списка проектов
pub fn project_facets() -> Vec<Facet<Project>> {
    vec![Facet::new("status", "Статус", |p: &Project| {
        Some(p.status.display_name().to_string())
    })]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        for status in [
            ProjectStatus::Lead,
            ProjectStatus::Survey,
            ProjectStatus::Installation,
            ProjectStatus::Commissioned,
            ProjectStatus::Cancelled,
        ] {
            assert_eq!(ProjectStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(ProjectStatus::from_code("paused"), None);
    }

    #[test]
    fn test_status_serialized_as_code() {
        let json = serde_json::to_string(&ProjectStatus::Commissioned).unwrap();
        assert_eq!(json, "\"commissioned\"");
    }
}
