use contracts::domain::a001_location::{LocationId, LocationNode, LocationNodeDto, LocationTier};
use thiserror::Error;
use uuid::Uuid;

use super::repository;

/// Ошибки администрирования справочника, которые отдаются клиенту как 4xx
#[derive(Debug, Error)]
pub enum LocationAdminError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Parent location not found: {0}")]
    ParentNotFound(String),

    #[error("Location {0} cannot be placed under its own descendant")]
    Cycle(String),

    #[error("Location {id} still has {count} active children")]
    HasActiveChildren { id: String, count: u64 },

    #[error("Location not found: {0}")]
    NotFound(String),
}

/// Дочерние узлы для каскадного выбора
pub async fn list_children(
    tier: LocationTier,
    parent: Option<&str>,
) -> anyhow::Result<Vec<LocationNode>> {
    if tier != LocationTier::Country && tier != LocationTier::State && parent.is_none() {
        return Err(LocationAdminError::Validation(format!(
            "parent is required to list {}",
            tier
        ))
        .into());
    }
    repository::list_children(tier, parent).await
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<LocationNode>> {
    repository::get_by_id(id).await
}

/// Создание или обновление узла с проверкой ссылки на родителя
pub async fn upsert(dto: LocationNodeDto) -> anyhow::Result<String> {
    let existing = match dto.id.as_deref() {
        Some(id) => repository::get_by_id(id).await?,
        None => None,
    };
    let id = dto
        .id
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let node = LocationNode {
        id: LocationId(id.clone()),
        tier: dto.tier,
        name: dto.name.trim().to_string(),
        parent_id: dto
            .parent_id
            .filter(|p| !p.trim().is_empty())
            .map(LocationId),
        is_active: dto.is_active,
    };

    let parent = match &node.parent_id {
        Some(pid) => Some(
            repository::get_by_id(pid.as_str())
                .await?
                .ok_or_else(|| LocationAdminError::ParentNotFound(pid.0.clone()))?,
        ),
        None => None,
    };
    node.validate_parent(parent.as_ref())
        .map_err(LocationAdminError::Validation)?;
    ensure_not_descendant(&node).await?;

    let active_children = match &existing {
        Some(_) => repository::count_active_children(&id).await?,
        None => 0,
    };
    check_active_state(&node, parent.as_ref(), active_children)?;

    match existing {
        Some(prev) => {
            if prev.tier != node.tier && active_children > 0 {
                return Err(LocationAdminError::Validation(
                    "cannot change tier of a location with children".into(),
                )
                .into());
            }
            repository::update(&node).await?;
            tracing::info!("Updated location {} ({})", node.id, node.tier);
        }
        None => {
            repository::insert(&node).await?;
            tracing::info!("Created location {} ({})", node.id, node.tier);
        }
    }
    Ok(id)
}

/// Активный узел должен висеть под активным родителем, а неактивный
/// не может иметь активных детей: иначе ветка пропадает из справочника.
fn check_active_state(
    node: &LocationNode,
    parent: Option<&LocationNode>,
    active_children: u64,
) -> Result<(), LocationAdminError> {
    if node.is_active {
        if let Some(parent) = parent.filter(|p| !p.is_active) {
            return Err(LocationAdminError::Validation(format!(
                "parent location {} is inactive",
                parent.id
            )));
        }
    } else if active_children > 0 {
        return Err(LocationAdminError::HasActiveChildren {
            id: node.id.0.clone(),
            count: active_children,
        });
    }
    Ok(())
}

/// Поднимаемся от родителя к корню; встретить сам узел значит получить цикл
async fn ensure_not_descendant(node: &LocationNode) -> anyhow::Result<()> {
    let mut cursor = node.parent_id.clone();
    let mut steps = 0;
    while let Some(id) = cursor {
        if id == node.id {
            return Err(LocationAdminError::Cycle(node.id.0.clone()).into());
        }
        steps += 1;
        if steps > LocationTier::all().len() {
            return Err(LocationAdminError::Cycle(node.id.0.clone()).into());
        }
        cursor = repository::get_by_id(id.as_str())
            .await?
            .and_then(|n| n.parent_id);
    }
    Ok(())
}

/// Деактивация узла. Узел с активными потомками деактивировать нельзя,
/// иначе у выбранных ниже уровней пропадёт родитель.
pub async fn deactivate(id: &str) -> anyhow::Result<()> {
    let Some(mut node) = repository::get_by_id(id).await? else {
        return Err(LocationAdminError::NotFound(id.to_string()).into());
    };
    node.is_active = false;
    check_active_state(&node, None, repository::count_active_children(id).await?)?;
    repository::set_active(id, false).await?;
    tracing::info!("Deactivated location {}", id);
    Ok(())
}

/// Демонстрационный справочник: (id, уровень, наименование, родитель).
/// Родители идут раньше детей.
const DEMO_LOCATIONS: &[(&str, LocationTier, &str, Option<&str>)] = &[
    ("IN", LocationTier::Country, "India", None),
    ("GJ", LocationTier::State, "Gujarat", Some("IN")),
    ("GJ-AHD", LocationTier::Cluster, "Ahmedabad", Some("GJ")),
    ("GJ-AHD-SND", LocationTier::District, "Sanand", Some("GJ-AHD")),
    ("GJ-AHD-DSK", LocationTier::District, "Daskroi", Some("GJ-AHD")),
    ("GJ-SRT", LocationTier::Cluster, "Surat", Some("GJ")),
    ("GJ-SRT-OLP", LocationTier::District, "Olpad", Some("GJ-SRT")),
    ("GJ-SRT-CHR", LocationTier::District, "Choryasi", Some("GJ-SRT")),
    ("RJ", LocationTier::State, "Rajasthan", Some("IN")),
    ("RJ-JPR", LocationTier::Cluster, "Jaipur", Some("RJ")),
    ("RJ-JPR-SNG", LocationTier::District, "Sanganer", Some("RJ-JPR")),
    ("RJ-JPR-AMB", LocationTier::District, "Amber", Some("RJ-JPR")),
    ("RJ-JDH", LocationTier::Cluster, "Jodhpur", Some("RJ")),
    ("RJ-JDH-PHL", LocationTier::District, "Phalodi", Some("RJ-JDH")),
    ("MH", LocationTier::State, "Maharashtra", Some("IN")),
    ("MH-PNE", LocationTier::Cluster, "Pune", Some("MH")),
    ("MH-PNE-HVL", LocationTier::District, "Haveli", Some("MH-PNE")),
    ("MH-PNE-MLS", LocationTier::District, "Mulshi", Some("MH-PNE")),
];

pub fn demo_nodes() -> Vec<LocationNodeDto> {
    DEMO_LOCATIONS
        .iter()
        .map(|(id, tier, name, parent)| LocationNodeDto {
            id: Some(id.to_string()),
            tier: *tier,
            name: name.to_string(),
            parent_id: parent.map(str::to_string),
            is_active: true,
        })
        .collect()
}

/// Вставка тестовых данных (родители идут раньше детей)
pub async fn insert_test_data() -> anyhow::Result<()> {
    for dto in demo_nodes() {
        upsert(dto).await?;
    }
    Ok(())
}

/// Заполнить справочник, если он пуст
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
    use std::collections::HashSet;

    #[test]
    fn test_demo_nodes_parents_come_first() {
        let mut seen: HashSet<String> = HashSet::new();
        for dto in demo_nodes() {
            if let Some(parent) = &dto.parent_id {
                assert!(seen.contains(parent), "{} listed before parent", dto.name);
            }
            seen.insert(dto.id.clone().unwrap());
        }
    }

    fn node(id: &str, tier: LocationTier, parent: Option<&str>, is_active: bool) -> LocationNode {
        LocationNode {
            id: LocationId(id.to_string()),
            tier,
            name: id.to_string(),
            parent_id: parent.map(|p| LocationId(p.to_string())),
            is_active,
        }
    }

    #[test]
    fn test_inactive_node_with_active_children_is_rejected() {
        let gj = node("GJ", LocationTier::State, Some("IN"), false);
        let err = check_active_state(&gj, None, 2).unwrap_err();
        assert!(matches!(
            err,
            LocationAdminError::HasActiveChildren { ref id, count: 2 } if id == "GJ"
        ));
        assert!(check_active_state(&gj, None, 0).is_ok());
    }

    #[test]
    fn test_active_node_under_inactive_parent_is_rejected() {
        let gj = node("GJ", LocationTier::State, Some("IN"), false);
        let child = node("GJ-NEW", LocationTier::Cluster, Some("GJ"), true);
        let err = check_active_state(&child, Some(&gj), 0).unwrap_err();
        assert!(matches!(err, LocationAdminError::Validation(_)));

        // inactive child under inactive parent is fine
        let hidden = node("GJ-OLD", LocationTier::Cluster, Some("GJ"), false);
        assert!(check_active_state(&hidden, Some(&gj), 0).is_ok());

        let active_gj = node("GJ", LocationTier::State, Some("IN"), true);
        assert!(check_active_state(&child, Some(&active_gj), 0).is_ok());
    }

    #[test]
    fn test_demo_nodes_follow_tier_order() {
        let nodes = demo_nodes();
        for dto in &nodes {
            let parent = dto
                .parent_id
                .as_ref()
                .and_then(|p| nodes.iter().find(|n| n.id.as_deref() == Some(p.as_str())));
            assert_eq!(parent.map(|p| p.tier), dto.tier.parent());
        }
    }
}
