use contracts::domain::a001_location::LocationSelection;
use contracts::shared::faceted_filter::{Facet, FacetedFilterEngine, FilterEvent, Locatable};
use leptos::prelude::*;

/// Описание фасета для отрисовки панели
#[derive(Debug, Clone, PartialEq)]
pub struct FacetView {
    pub name: String,
    pub label: String,
    pub options: Vec<String>,
    pub selected: Vec<String>,
}

/// Движок фасетных фильтров экрана в реактивной обёртке.
///
/// Любое событие движка увеличивает `version`; все чтения через handle
/// подписываются на неё, поэтому пересчитываются после каждого изменения.
pub struct FacetFilterHandle<R: 'static> {
    engine: StoredValue<FacetedFilterEngine<R>>,
    version: RwSignal<u64>,
}

impl<R> Clone for FacetFilterHandle<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for FacetFilterHandle<R> {}

impl<R> FacetFilterHandle<R>
where
    R: Locatable + Clone + Send + Sync + 'static,
{
    pub fn new(facets: Vec<Facet<R>>) -> Self {
        let version = RwSignal::new(0u64);
        let mut engine = FacetedFilterEngine::new(facets);
        engine.subscribe(move |event| {
            if let FilterEvent::RecordsReplaced { count } = event {
                log::debug!("facet filter got {} records", count);
            }
            version.update(|v| *v += 1);
        });
        Self {
            engine: StoredValue::new(engine),
            version,
        }
    }

    fn read<T>(&self, f: impl FnOnce(&FacetedFilterEngine<R>) -> T) -> Option<T> {
        self.version.track();
        self.engine.try_with_value(f)
    }

    fn write<T>(&self, f: impl FnOnce(&mut FacetedFilterEngine<R>) -> T) -> Option<T> {
        self.engine.try_update_value(f)
    }

    pub fn set_records(&self, records: Vec<R>) {
        self.write(|e| e.set_records(records));
    }

    pub fn set_location_scope(&self, scope: LocationSelection) {
        self.write(|e| e.set_location_scope(scope));
    }

    pub fn toggle(&self, facet: &str, value: &str) {
        if let Some(Err(e)) = self.write(|e| e.toggle_facet_value(facet, value)) {
            log::error!("{}", e);
        }
    }

    pub fn clear_facet(&self, facet: &str) {
        if let Some(Err(e)) = self.write(|e| e.clear_facet(facet)) {
            log::error!("{}", e);
        }
    }

    pub fn clear_all(&self) {
        self.write(|e| e.clear_all());
    }

    pub fn active_filters_count(&self) -> usize {
        self.read(|e| e.active_filters_count()).unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.read(|e| e.records().len()).unwrap_or(0)
    }

    /// Записи, прошедшие фильтр (реактивно)
    pub fn filtered(&self) -> Vec<R> {
        self.read(|e| e.filtered_records().into_iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Фасеты с вариантами и текущим выбором (реактивно)
    pub fn facet_views(&self) -> Vec<FacetView> {
        self.read(|e| {
            e.facets()
                .iter()
                .zip(e.all_options())
                .map(|(facet, (_, options))| FacetView {
                    name: facet.name().to_string(),
                    label: facet.label().to_string(),
                    options,
                    selected: facet.selected().iter().cloned().collect(),
                })
                .collect()
        })
        .unwrap_or_default()
    }
}
