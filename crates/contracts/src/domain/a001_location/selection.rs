use serde::{Deserialize, Serialize};

use super::aggregate::{LocationId, LocationTier};

/// Текущий выбор локации на экране.
///
/// Живёт только пока открыт экран. Изменяется исключительно через
/// `LocationHierarchyController`, поэтому инвариант "выбран нижний уровень
/// значит выбран и его родитель" здесь не перепроверяется.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSelection {
    pub country: Option<LocationId>,
    pub state: Option<LocationId>,
    pub cluster: Option<LocationId>,
    pub district: Option<LocationId>,
}

impl LocationSelection {
    pub fn get(&self, tier: LocationTier) -> Option<&LocationId> {
        match tier {
            LocationTier::Country => self.country.as_ref(),
            LocationTier::State => self.state.as_ref(),
            LocationTier::Cluster => self.cluster.as_ref(),
            LocationTier::District => self.district.as_ref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, tier: LocationTier) -> &mut Option<LocationId> {
        match tier {
            LocationTier::Country => &mut self.country,
            LocationTier::State => &mut self.state,
            LocationTier::Cluster => &mut self.cluster,
            LocationTier::District => &mut self.district,
        }
    }

    /// Сбросить все уровни ниже `tier`
    pub(crate) fn clear_below(&mut self, tier: LocationTier) {
        let mut next = tier.child();
        while let Some(t) = next {
            *self.slot_mut(t) = None;
            next = t.child();
        }
    }

    pub fn is_empty(&self) -> bool {
        LocationTier::all().into_iter().all(|t| self.get(t).is_none())
    }

    /// Самый глубокий выбранный уровень
    pub fn deepest(&self) -> Option<(LocationTier, &LocationId)> {
        LocationTier::all()
            .into_iter()
            .rev()
            .find_map(|t| self.get(t).map(|id| (t, id)))
    }

    /// Запись проходит, если на каждом заполненном уровне её локация совпадает.
    /// Незаполненные уровни ничего не ограничивают; отсутствие поля у записи
    /// при заполненном уровне - не совпадение.
    pub fn matches<'a, F>(&self, locate: F) -> bool
    where
        F: Fn(LocationTier) -> Option<&'a str>,
    {
        LocationTier::all().into_iter().all(|tier| match self.get(tier) {
            None => true,
            Some(id) => locate(tier) == Some(id.as_str()),
        })
    }

    /// Пары для query string (`state_id=...` и т.д.)
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        LocationTier::all()
            .into_iter()
            .filter_map(|t| self.get(t).map(|id| (t.query_key(), id.0.clone())))
            .collect()
    }
}

/// Параметры запроса, которыми экран ограничивает выборку записей по локации
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_id: Option<String>,
}

impl From<&LocationSelection> for LocationQuery {
    fn from(sel: &LocationSelection) -> Self {
        Self {
            country_id: sel.country.as_ref().map(|id| id.0.clone()),
            state_id: sel.state.as_ref().map(|id| id.0.clone()),
            cluster_id: sel.cluster.as_ref().map(|id| id.0.clone()),
            district_id: sel.district.as_ref().map(|id| id.0.clone()),
        }
    }
}

impl LocationQuery {
    /// Обратное преобразование для backend. Пустые строки считаются отсутствием.
    pub fn to_selection(&self) -> LocationSelection {
        let id = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(LocationId::from)
        };
        LocationSelection {
            country: id(&self.country_id),
            state: id(&self.state_id),
            cluster: id(&self.cluster_id),
            district: id(&self.district_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> LocationSelection {
        LocationSelection {
            country: Some("IN".into()),
            state: Some("S1".into()),
            cluster: Some("C1".into()),
            district: None,
        }
    }

    #[test]
    fn test_clear_below_state() {
        let mut sel = selection();
        sel.district = Some("D1".into());
        sel.clear_below(LocationTier::State);
        assert_eq!(sel.state, Some("S1".into()));
        assert_eq!(sel.cluster, None);
        assert_eq!(sel.district, None);
    }

    #[test]
    fn test_deepest() {
        let sel = selection();
        assert_eq!(sel.deepest(), Some((LocationTier::Cluster, &"C1".into())));
        assert_eq!(LocationSelection::default().deepest(), None);
    }

    #[test]
    fn test_matches_ignores_unset_tiers() {
        let sel = LocationSelection {
            state: Some("S1".into()),
            ..Default::default()
        };
        assert!(sel.matches(|t| match t {
            LocationTier::State => Some("S1"),
            _ => None,
        }));
        assert!(!sel.matches(|t| match t {
            LocationTier::State => Some("S2"),
            _ => None,
        }));
        // absent field is not a wildcard
        assert!(!sel.matches(|_| None));
    }

    #[test]
    fn test_query_round_trip_drops_blank_values() {
        let query = LocationQuery {
            state_id: Some("S1".into()),
            cluster_id: Some("  ".into()),
            ..Default::default()
        };
        let sel = query.to_selection();
        assert_eq!(sel.state, Some("S1".into()));
        assert_eq!(sel.cluster, None);
        assert_eq!(
            selection().to_query(),
            vec![
                ("country_id", "IN".to_string()),
                ("state_id", "S1".to_string()),
                ("cluster_id", "C1".to_string()),
            ]
        );
    }
}
