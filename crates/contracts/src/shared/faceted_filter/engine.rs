use std::collections::BTreeSet;

use crate::domain::a001_location::{LocationSelection, LocationTier};
use crate::shared::errors::FilterError;

/// Запись, которую можно ограничить выбранной локацией
pub trait Locatable {
    /// Идентификатор локации записи на уровне `tier`, если он известен
    fn location_id(&self, tier: LocationTier) -> Option<&str>;
}

pub type FacetAccessor<R> = Box<dyn Fn(&R) -> Option<String> + Send + Sync>;

/// Измерение фильтрации: как прочитать значение из записи и что сейчас выбрано.
///
/// Пустой набор выбранных значений означает "без ограничения".
pub struct Facet<R> {
    name: String,
    label: String,
    accessor: FacetAccessor<R>,
    selected: BTreeSet<String>,
}

impl<R> Facet<R> {
    pub fn new<F>(name: impl Into<String>, label: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            label: label.into(),
            accessor: Box::new(accessor),
            selected: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn value(&self, record: &R) -> Option<String> {
        (self.accessor)(record)
    }

    /// Отсутствующее значение не является "любым": при непустом выборе
    /// такая запись не проходит.
    fn accepts(&self, record: &R) -> bool {
        if self.selected.is_empty() {
            return true;
        }
        match self.value(record) {
            Some(v) => self.selected.contains(&v),
            None => false,
        }
    }
}

impl<R> std::fmt::Debug for Facet<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Facet")
            .field("name", &self.name)
            .field("selected", &self.selected)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    FacetChanged { facet: String },
    Cleared,
    RecordsReplaced { count: usize },
    ScopeChanged(LocationSelection),
}

pub type FilterSubscriptionId = u64;

type FilterListener = Box<dyn Fn(&FilterEvent) + Send + Sync>;

/// Движок фасетных фильтров над коллекцией записей в памяти.
///
/// Варианты фасета считаются по записям, прошедшим все *остальные* фасеты и
/// ограничение по локации. Собственный выбор фасета его варианты не сужает.
pub struct FacetedFilterEngine<R> {
    facets: Vec<Facet<R>>,
    records: Vec<R>,
    scope: LocationSelection,
    listeners: Vec<(FilterSubscriptionId, FilterListener)>,
    next_subscription: FilterSubscriptionId,
}

impl<R> std::fmt::Debug for FacetedFilterEngine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacetedFilterEngine")
            .field("facets", &self.facets)
            .field("records", &self.records.len())
            .field("scope", &self.scope)
            .finish()
    }
}

impl<R: Locatable> FacetedFilterEngine<R> {
    /// Фасеты адресуются по имени, поэтому повтор имени отбрасывается
    /// с предупреждением: остаётся первый фасет с этим именем.
    pub fn new(facets: Vec<Facet<R>>) -> Self {
        let mut unique: Vec<Facet<R>> = Vec::with_capacity(facets.len());
        for facet in facets {
            if unique.iter().any(|f| f.name == facet.name) {
                log::warn!("duplicate facet '{}' ignored", facet.name);
                continue;
            }
            unique.push(facet);
        }
        Self::build(unique)
    }

    /// Строгий вариант `new`: повтор имени фасета является ошибкой
    pub fn try_new(facets: Vec<Facet<R>>) -> Result<Self, FilterError> {
        for (i, facet) in facets.iter().enumerate() {
            if facets[..i].iter().any(|f| f.name == facet.name) {
                return Err(FilterError::DuplicateFacet(facet.name.clone()));
            }
        }
        Ok(Self::build(facets))
    }

    fn build(facets: Vec<Facet<R>>) -> Self {
        Self {
            facets,
            records: Vec::new(),
            scope: LocationSelection::default(),
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    pub fn with_records(mut self, records: Vec<R>) -> Self {
        self.records = records;
        self
    }

    // ------------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------------

    /// Заменить коллекцию записей (обновляет хост после очередной загрузки)
    pub fn set_records(&mut self, records: Vec<R>) {
        self.records = records;
        self.emit(FilterEvent::RecordsReplaced {
            count: self.records.len(),
        });
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn set_location_scope(&mut self, scope: LocationSelection) {
        if self.scope == scope {
            return;
        }
        self.scope = scope;
        self.emit(FilterEvent::ScopeChanged(self.scope.clone()));
    }

    pub fn location_scope(&self) -> &LocationSelection {
        &self.scope
    }

    pub fn facets(&self) -> &[Facet<R>] {
        &self.facets
    }

    pub fn facet_names(&self) -> Vec<&str> {
        self.facets.iter().map(|f| f.name()).collect()
    }

    pub fn facet(&self, name: &str) -> Result<&Facet<R>, FilterError> {
        self.index_of(name).map(|i| &self.facets[i])
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    /// Добавить значение в выбор фасета или убрать, если оно уже выбрано.
    /// Возвращает true, если после вызова значение выбрано.
    pub fn toggle_facet_value(&mut self, name: &str, value: &str) -> Result<bool, FilterError> {
        let idx = self.index_of(name)?;
        let selected = &mut self.facets[idx].selected;
        let now_selected = if selected.remove(value) {
            false
        } else {
            selected.insert(value.to_string());
            true
        };
        self.emit(FilterEvent::FacetChanged {
            facet: name.to_string(),
        });
        Ok(now_selected)
    }

    /// Заменить выбор фасета целиком
    pub fn select_values<I>(&mut self, name: &str, values: I) -> Result<(), FilterError>
    where
        I: IntoIterator<Item = String>,
    {
        let idx = self.index_of(name)?;
        self.facets[idx].selected = values.into_iter().collect();
        self.emit(FilterEvent::FacetChanged {
            facet: name.to_string(),
        });
        Ok(())
    }

    pub fn selected(&self, name: &str) -> Result<&BTreeSet<String>, FilterError> {
        self.facet(name).map(|f| f.selected())
    }

    pub fn clear_facet(&mut self, name: &str) -> Result<(), FilterError> {
        let idx = self.index_of(name)?;
        self.facets[idx].selected.clear();
        self.emit(FilterEvent::FacetChanged {
            facet: name.to_string(),
        });
        Ok(())
    }

    /// Сбросить выбор всех фасетов. Ограничение по локации не трогается:
    /// им владеет контроллер локаций.
    pub fn clear_all(&mut self) {
        for facet in &mut self.facets {
            facet.selected.clear();
        }
        self.emit(FilterEvent::Cleared);
    }

    /// Количество фасетов с непустым выбором (для бейджа на панели)
    pub fn active_filters_count(&self) -> usize {
        self.facets.iter().filter(|f| !f.selected.is_empty()).count()
    }

    // ------------------------------------------------------------------------
    // Derived
    // ------------------------------------------------------------------------

    /// Записи, прошедшие все фасеты и ограничение по локации, в исходном порядке
    pub fn filtered_records(&self) -> Vec<&R> {
        self.records
            .iter()
            .filter(|r| self.passes(r, None))
            .collect()
    }

    /// Различные значения фасета среди записей, прошедших все остальные фасеты
    /// и ограничение по локации. Сортировка по возрастанию.
    pub fn options_for(&self, name: &str) -> Result<Vec<String>, FilterError> {
        let idx = self.index_of(name)?;
        Ok(self.options_at(idx))
    }

    /// Варианты всех фасетов за один вызов: (имя фасета, варианты)
    pub fn all_options(&self) -> Vec<(String, Vec<String>)> {
        (0..self.facets.len())
            .map(|i| (self.facets[i].name.clone(), self.options_at(i)))
            .collect()
    }

    fn options_at(&self, idx: usize) -> Vec<String> {
        let facet = &self.facets[idx];
        self.records
            .iter()
            .filter(|r| self.passes(r, Some(idx)))
            .filter_map(|r| facet.value(r))
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect()
    }

    fn passes(&self, record: &R, except: Option<usize>) -> bool {
        if !self.scope.matches(|tier| record.location_id(tier)) {
            return false;
        }
        self.facets
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != except)
            .all(|(_, f)| f.accepts(record))
    }

    fn index_of(&self, name: &str) -> Result<usize, FilterError> {
        self.facets
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| FilterError::UnknownFacet(name.to_string()))
    }

    // ------------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------------

    pub fn subscribe<F>(&mut self, listener: F) -> FilterSubscriptionId
    where
        F: Fn(&FilterEvent) + Send + Sync + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: FilterSubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        before != self.listeners.len()
    }

    fn emit(&self, event: FilterEvent) {
        for (_, listener) in &self.listeners {
            listener(&event);
        }
    }
}
