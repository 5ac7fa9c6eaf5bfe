use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Tier
// ============================================================================

/// Уровень иерархии локаций
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationTier {
    Country,
    State,
    /// В части экранов этот же уровень подписан как "City"
    Cluster,
    District,
}

impl LocationTier {
    /// Уровень непосредственно выше (None для корня)
    pub fn parent(&self) -> Option<LocationTier> {
        match self {
            LocationTier::Country => None,
            LocationTier::State => Some(LocationTier::Country),
            LocationTier::Cluster => Some(LocationTier::State),
            LocationTier::District => Some(LocationTier::Cluster),
        }
    }

    /// Уровень непосредственно ниже (None для листа)
    pub fn child(&self) -> Option<LocationTier> {
        match self {
            LocationTier::Country => Some(LocationTier::State),
            LocationTier::State => Some(LocationTier::Cluster),
            LocationTier::Cluster => Some(LocationTier::District),
            LocationTier::District => None,
        }
    }

    /// Код уровня (используется в БД и в query string)
    pub fn code(&self) -> &'static str {
        match self {
            LocationTier::Country => "country",
            LocationTier::State => "state",
            LocationTier::Cluster => "cluster",
            LocationTier::District => "district",
        }
    }

    /// Человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            LocationTier::Country => "Country",
            LocationTier::State => "State",
            LocationTier::Cluster => "Cluster / City",
            LocationTier::District => "District",
        }
    }

    /// Все уровни сверху вниз
    pub fn all() -> Vec<LocationTier> {
        vec![
            LocationTier::Country,
            LocationTier::State,
            LocationTier::Cluster,
            LocationTier::District,
        ]
    }

    /// Парсинг из строки. "city" принимается как синоним "cluster".
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "country" => Some(LocationTier::Country),
            "state" => Some(LocationTier::State),
            "cluster" | "city" => Some(LocationTier::Cluster),
            "district" => Some(LocationTier::District),
            _ => None,
        }
    }

    /// Имя параметра запроса, которым этот уровень ограничивает выборку
    pub fn query_key(&self) -> &'static str {
        match self {
            LocationTier::Country => "country_id",
            LocationTier::State => "state_id",
            LocationTier::Cluster => "cluster_id",
            LocationTier::District => "district_id",
        }
    }
}

impl fmt::Display for LocationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// ID Type
// ============================================================================

/// Непрозрачный стабильный идентификатор узла локации
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub String);

impl LocationId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Пустой идентификатор трактуется как "не выбрано"
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for LocationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ============================================================================
// Node
// ============================================================================

/// Узел справочника локаций (страна, штат, кластер/город, район)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationNode {
    pub id: LocationId,
    pub tier: LocationTier,
    pub name: String,
    #[serde(rename = "parentId")]
    pub parent_id: Option<LocationId>,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

impl LocationNode {
    pub fn new(
        id: impl Into<LocationId>,
        tier: LocationTier,
        name: impl Into<String>,
        parent_id: Option<LocationId>,
    ) -> Self {
        Self {
            id: id.into(),
            tier,
            name: name.into(),
            parent_id,
            is_active: true,
        }
    }

    /// Проверка ссылки на родителя.
    ///
    /// Родитель обязан быть ровно на уровень выше; у страны родителя нет;
    /// узел не может ссылаться сам на себя. Проверка циклов глубже одного
    /// уровня требует доступа к справочнику и выполняется на backend.
    pub fn validate_parent(&self, parent: Option<&LocationNode>) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Наименование не может быть пустым".into());
        }
        if let Some(parent_id) = &self.parent_id {
            if parent_id == &self.id {
                return Err("Узел не может быть родителем самому себе".into());
            }
        }

        match (self.tier.parent(), parent) {
            (None, None) => Ok(()),
            (None, Some(_)) => Err(format!("Уровень {} не может иметь родителя", self.tier)),
            (Some(expected), None) => Err(format!(
                "Для уровня {} требуется родитель уровня {}",
                self.tier, expected
            )),
            (Some(expected), Some(p)) => {
                if self.parent_id.as_ref() != Some(&p.id) {
                    return Err("parent_id не совпадает с переданным родителем".into());
                }
                if p.tier != expected {
                    return Err(format!(
                        "Родитель уровня {} должен быть уровня {}, получен {}",
                        self.tier, expected, p.tier
                    ));
                }
                Ok(())
            }
        }
    }
}

/// DTO для создания/обновления узла через администрирование
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationNodeDto {
    pub id: Option<String>,
    pub tier: LocationTier,
    pub name: String,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    #[serde(rename = "isActive", default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(id: &str) -> LocationNode {
        LocationNode::new(id, LocationTier::State, "Gujarat", Some("IN".into()))
    }

    #[test]
    fn test_tier_neighbours() {
        assert_eq!(LocationTier::Country.parent(), None);
        assert_eq!(LocationTier::Cluster.parent(), Some(LocationTier::State));
        assert_eq!(LocationTier::Cluster.child(), Some(LocationTier::District));
        assert_eq!(LocationTier::District.child(), None);
        assert_eq!(LocationTier::from_code("city"), Some(LocationTier::Cluster));
        assert_eq!(LocationTier::from_code("planet"), None);
    }

    #[test]
    fn test_validate_parent_accepts_direct_parent() {
        let parent = state("S1");
        let cluster = LocationNode::new("C1", LocationTier::Cluster, "Ahmedabad", Some("S1".into()));
        assert!(cluster.validate_parent(Some(&parent)).is_ok());
    }

    #[test]
    fn test_validate_parent_rejects_skipped_tier() {
        let parent = state("S1");
        let district =
            LocationNode::new("D1", LocationTier::District, "Sanand", Some("S1".into()));
        assert!(district.validate_parent(Some(&parent)).is_err());
    }

    #[test]
    fn test_validate_parent_rejects_self_reference() {
        let node = LocationNode::new("S1", LocationTier::State, "Gujarat", Some("S1".into()));
        let err = node.validate_parent(Some(&node)).unwrap_err();
        assert!(err.contains("самому себе"));
    }

    #[test]
    fn test_country_has_no_parent() {
        let country = LocationNode::new("IN", LocationTier::Country, "India", None);
        assert!(country.validate_parent(None).is_ok());
        assert!(country.validate_parent(Some(&state("S1"))).is_err());
    }

    #[test]
    fn test_node_json_shape() {
        let node = state("S1");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["id"], "S1");
        assert_eq!(json["tier"], "state");
        assert_eq!(json["parentId"], "IN");
        assert_eq!(json["isActive"], true);
    }
}
