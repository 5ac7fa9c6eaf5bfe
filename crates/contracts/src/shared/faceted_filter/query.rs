use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::engine::{FacetedFilterEngine, Locatable};
use crate::domain::a001_location::LocationQuery;
use crate::shared::errors::FilterError;

/// Префикс параметров запроса, несущих выбор фасетов: `facet.product=Panel`
pub const FACET_PARAM_PREFIX: &str = "facet.";

/// Плоское представление выбора фасетов и локации для передачи в query string.
///
/// Значения одного фасета передаются повторяющимся ключом, поэтому запятые
/// и прочие символы внутри значений не требуют экранирования.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSelectionQuery {
    pub location: LocationQuery,
    pub selections: BTreeMap<String, BTreeSet<String>>,
}

impl FacetSelectionQuery {
    pub fn from_engine<R: Locatable>(engine: &FacetedFilterEngine<R>) -> Self {
        let selections = engine
            .facets()
            .iter()
            .filter(|f| !f.selected().is_empty())
            .map(|f| (f.name().to_string(), f.selected().clone()))
            .collect();
        Self {
            location: LocationQuery::from(engine.location_scope()),
            selections,
        }
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let location = [
            ("country_id", &self.location.country_id),
            ("state_id", &self.location.state_id),
            ("cluster_id", &self.location.cluster_id),
            ("district_id", &self.location.district_id),
        ];
        let mut pairs: Vec<(String, String)> = location
            .into_iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.to_string(), v.clone())))
            .collect();
        for (facet, values) in &self.selections {
            for value in values {
                pairs.push((format!("{}{}", FACET_PARAM_PREFIX, facet), value.clone()));
            }
        }
        pairs
    }

    /// Разбор пар запроса. Неизвестные ключи игнорируются.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let value = value.trim().to_string();
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                "country_id" => query.location.country_id = Some(value),
                "state_id" => query.location.state_id = Some(value),
                "cluster_id" => query.location.cluster_id = Some(value),
                "district_id" => query.location.district_id = Some(value),
                other => {
                    if let Some(facet) = other.strip_prefix(FACET_PARAM_PREFIX) {
                        query
                            .selections
                            .entry(facet.to_string())
                            .or_default()
                            .insert(value);
                    }
                }
            }
        }
        query
    }

    /// Перенести выбор в движок. Неизвестный фасет - ошибка использования.
    pub fn apply<R: Locatable>(&self, engine: &mut FacetedFilterEngine<R>) -> Result<(), FilterError> {
        engine.set_location_scope(self.location.to_selection());
        for (facet, values) in &self.selections {
            engine.select_values(facet, values.iter().cloned())?;
        }
        Ok(())
    }
}

/// Варианты одного фасета в ответе backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOptions {
    pub name: String,
    pub label: String,
    pub options: Vec<String>,
    pub selected: Vec<String>,
}

/// Ответ `GET /api/supplier/facets`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOptionsResponse {
    pub facets: Vec<FacetOptions>,
    pub matched: usize,
    pub total: usize,
}

impl FacetOptionsResponse {
    pub fn from_engine<R: Locatable>(engine: &FacetedFilterEngine<R>) -> Self {
        let facets = engine
            .facets()
            .iter()
            .zip(engine.all_options())
            .map(|(facet, (_, options))| FacetOptions {
                name: facet.name().to_string(),
                label: facet.label().to_string(),
                options,
                selected: facet.selected().iter().cloned().collect(),
            })
            .collect();
        Self {
            facets,
            matched: engine.filtered_records().len(),
            total: engine.records().len(),
        }
    }
}
