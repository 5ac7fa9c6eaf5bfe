use std::collections::BTreeMap;

use crate::domain::a001_location::{LocationId, LocationNode, LocationSelection, LocationTier};
use crate::shared::errors::LocationError;

// ============================================================================
// Types
// ============================================================================

/// С какого уровня начинается иерархия на конкретном экране
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HierarchyRoot {
    Country,
    #[default]
    State,
}

impl HierarchyRoot {
    pub fn tier(&self) -> LocationTier {
        match self {
            HierarchyRoot::Country => LocationTier::Country,
            HierarchyRoot::State => LocationTier::State,
        }
    }

    /// Уровни, участвующие в выборе, сверху вниз
    pub fn tiers(&self) -> Vec<LocationTier> {
        let root = self.tier();
        LocationTier::all()
            .into_iter()
            .filter(|t| *t >= root)
            .collect()
    }
}

/// Состояние списка вариантов одного уровня
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TierStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TierOptions {
    pub status: TierStatus,
    pub items: Vec<LocationNode>,
    generation: u64,
}

impl TierOptions {
    pub fn is_loading(&self) -> bool {
        self.status == TierStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            TierStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn contains(&self, id: &LocationId) -> bool {
        self.items.iter().any(|n| &n.id == id)
    }

    pub fn find(&self, id: &LocationId) -> Option<&LocationNode> {
        self.items.iter().find(|n| &n.id == id)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Тикет на загрузку вариантов следующего уровня.
///
/// Хост выполняет запрос и возвращает результат через
/// [`LocationHierarchyController::complete_load`]. Поколение фиксируется в
/// момент выдачи тикета.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    pub tier: LocationTier,
    pub parent: Option<LocationId>,
    pub generation: u64,
}

/// Чем закончилась попытка применить результат загрузки
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { tier: LocationTier, count: usize },
    Failed(LocationError),
    /// Пока запрос был в полёте, выбор выше по иерархии изменился
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationEvent {
    SelectionChanged(LocationSelection),
    OptionsLoading { tier: LocationTier },
    OptionsLoaded { tier: LocationTier, count: usize },
    LoadFailed(LocationError),
    /// Выбран район - выбор полностью завершён
    SelectionComplete(LocationSelection),
    Reset,
}

pub type SubscriptionId = u64;

type Listener = Box<dyn Fn(&LocationEvent) + Send + Sync>;

/// Снимок состояния для отрисовки
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationSnapshot {
    pub selection: LocationSelection,
    pub tiers: Vec<(LocationTier, TierOptions)>,
}

impl LocationSnapshot {
    pub fn options(&self, tier: LocationTier) -> Option<&TierOptions> {
        self.tiers.iter().find(|(t, _)| *t == tier).map(|(_, o)| o)
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Каскадный выбор State -> Cluster -> District (опционально от Country).
///
/// Создаётся отдельно на каждый экран. Изменение выбора синхронно сбрасывает
/// все нижние уровни и возвращает тикет на загрузку следующего уровня.
/// Результат загрузки применяется, только если поколение тикета совпадает с
/// текущим поколением уровня.
pub struct LocationHierarchyController {
    root: HierarchyRoot,
    selection: LocationSelection,
    tiers: BTreeMap<LocationTier, TierOptions>,
    generation: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl Default for LocationHierarchyController {
    fn default() -> Self {
        Self::new(HierarchyRoot::default())
    }
}

impl std::fmt::Debug for LocationHierarchyController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationHierarchyController")
            .field("root", &self.root)
            .field("selection", &self.selection)
            .field("tiers", &self.tiers)
            .field("generation", &self.generation)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl LocationHierarchyController {
    pub fn new(root: HierarchyRoot) -> Self {
        let tiers = root
            .tiers()
            .into_iter()
            .map(|t| (t, TierOptions::default()))
            .collect();
        Self {
            root,
            selection: LocationSelection::default(),
            tiers,
            generation: 0,
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    pub fn root(&self) -> HierarchyRoot {
        self.root
    }

    pub fn selection(&self) -> &LocationSelection {
        &self.selection
    }

    /// None, если уровень не используется на этом экране
    pub fn options(&self, tier: LocationTier) -> Option<&TierOptions> {
        self.tiers.get(&tier)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> LocationSnapshot {
        LocationSnapshot {
            selection: self.selection.clone(),
            tiers: self
                .tiers
                .iter()
                .map(|(t, o)| (*t, o.clone()))
                .collect(),
        }
    }

    // ------------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------------

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&LocationEvent) + Send + Sync + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        before != self.listeners.len()
    }

    fn emit(&self, event: LocationEvent) {
        for (_, listener) in &self.listeners {
            listener(&event);
        }
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Загрузить варианты корневого уровня. Повторный вызов перезагружает их
    /// и снимает весь выбор: выбранного узла в новом списке может не быть.
    pub fn start(&mut self) -> PendingLoad {
        self.reload(self.root.tier(), None)
    }

    pub fn select_country(
        &mut self,
        id: Option<LocationId>,
    ) -> Result<Option<PendingLoad>, LocationError> {
        self.select(LocationTier::Country, id)
    }

    pub fn select_state(
        &mut self,
        id: Option<LocationId>,
    ) -> Result<Option<PendingLoad>, LocationError> {
        self.select(LocationTier::State, id)
    }

    pub fn select_cluster(
        &mut self,
        id: Option<LocationId>,
    ) -> Result<Option<PendingLoad>, LocationError> {
        self.select(LocationTier::Cluster, id)
    }

    pub fn select_district(&mut self, id: Option<LocationId>) -> Result<(), LocationError> {
        self.select(LocationTier::District, id).map(|_| ())
    }

    /// Выбор на произвольном уровне. Пустой id означает снятие выбора.
    pub fn select(
        &mut self,
        tier: LocationTier,
        id: Option<LocationId>,
    ) -> Result<Option<PendingLoad>, LocationError> {
        let id = id.filter(|id| !id.is_blank());
        self.check_selectable(tier, id.as_ref())?;

        *self.selection.slot_mut(tier) = id.clone();
        self.selection.clear_below(tier);
        self.invalidate_below(tier);

        let pending = match (tier.child(), id.as_ref()) {
            (Some(child), Some(parent)) => Some(self.dispatch(child, Some(parent.clone()))),
            _ => None,
        };

        self.emit(LocationEvent::SelectionChanged(self.selection.clone()));
        if tier == LocationTier::District && id.is_some() {
            self.emit(LocationEvent::SelectionComplete(self.selection.clone()));
        }
        Ok(pending)
    }

    /// Полный сброс выбора и всех зависимых списков.
    ///
    /// Список корневого уровня от выбора не зависит и сохраняется.
    pub fn reset(&mut self) {
        self.selection = LocationSelection::default();
        let root = self.root.tier();
        self.invalidate_below(root);
        self.emit(LocationEvent::Reset);
        self.emit(LocationEvent::SelectionChanged(self.selection.clone()));
    }

    /// Повторить загрузку уровня (например, после ошибки).
    /// Выбор на этом уровне и ниже снимается.
    /// None, если родитель уровня сейчас не выбран.
    pub fn retry(&mut self, tier: LocationTier) -> Option<PendingLoad> {
        if !self.tiers.contains_key(&tier) {
            return None;
        }
        if tier == self.root.tier() {
            return Some(self.start());
        }
        let parent = tier.parent().and_then(|p| self.selection.get(p)).cloned()?;
        Some(self.reload(tier, Some(parent)))
    }

    /// Применить результат загрузки.
    ///
    /// Устаревший тикет молча отбрасывается: ни вариантов, ни ошибки.
    pub fn complete_load(
        &mut self,
        pending: &PendingLoad,
        result: Result<Vec<LocationNode>, String>,
    ) -> LoadOutcome {
        let current = self.tiers.get(&pending.tier).map(|o| o.generation);
        if current != Some(pending.generation) {
            log::debug!(
                "dropping stale {} load (generation {}, current {:?})",
                pending.tier,
                pending.generation,
                current
            );
            return LoadOutcome::Stale;
        }

        let (event, outcome) = match result {
            Ok(nodes) => {
                let items: Vec<LocationNode> = nodes
                    .into_iter()
                    .filter(|n| n.is_active && n.tier == pending.tier)
                    .filter(|n| pending.parent.is_none() || n.parent_id == pending.parent)
                    .collect();
                let count = items.len();
                if let Some(slot) = self.tiers.get_mut(&pending.tier) {
                    slot.status = TierStatus::Loaded;
                    slot.items = items;
                }
                (
                    LocationEvent::OptionsLoaded {
                        tier: pending.tier,
                        count,
                    },
                    LoadOutcome::Applied {
                        tier: pending.tier,
                        count,
                    },
                )
            }
            Err(message) => {
                log::warn!("location {} load failed: {}", pending.tier, message);
                if let Some(slot) = self.tiers.get_mut(&pending.tier) {
                    slot.status = TierStatus::Failed(message.clone());
                    slot.items.clear();
                }
                let err = LocationError::DependentLoadFailed {
                    tier: pending.tier,
                    message,
                };
                (
                    LocationEvent::LoadFailed(err.clone()),
                    LoadOutcome::Failed(err),
                )
            }
        };
        self.emit(event);
        outcome
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn check_selectable(
        &self,
        tier: LocationTier,
        id: Option<&LocationId>,
    ) -> Result<(), LocationError> {
        let inconsistent = |reason: String| LocationError::InconsistentSelection { tier, reason };

        let Some(options) = self.tiers.get(&tier) else {
            return Err(inconsistent(format!(
                "уровень не используется, корень иерархии {}",
                self.root.tier()
            )));
        };
        let Some(id) = id else {
            return Ok(());
        };

        if tier != self.root.tier() {
            if let Some(parent) = tier.parent() {
                if self.selection.get(parent).is_none() {
                    return Err(inconsistent(format!("не выбран уровень {}", parent)));
                }
            }
        }
        if options.status != TierStatus::Loaded || !options.contains(id) {
            return Err(inconsistent(format!(
                "{} отсутствует среди загруженных вариантов",
                id
            )));
        }
        Ok(())
    }

    /// Очистить списки всех уровней ниже `tier` и сделать их тикеты устаревшими
    fn invalidate_below(&mut self, tier: LocationTier) {
        let mut next = tier.child();
        while let Some(t) = next {
            if self.tiers.contains_key(&t) {
                let generation = self.next_generation();
                self.tiers.insert(
                    t,
                    TierOptions {
                        status: TierStatus::Idle,
                        items: Vec::new(),
                        generation,
                    },
                );
            }
            next = t.child();
        }
    }

    /// Перезагрузка уровня, на котором уже мог быть выбор
    fn reload(&mut self, tier: LocationTier, parent: Option<LocationId>) -> PendingLoad {
        let before = self.selection.clone();
        *self.selection.slot_mut(tier) = None;
        self.selection.clear_below(tier);
        self.invalidate_below(tier);
        let pending = self.dispatch(tier, parent);
        if self.selection != before {
            self.emit(LocationEvent::SelectionChanged(self.selection.clone()));
        }
        pending
    }

    fn dispatch(&mut self, tier: LocationTier, parent: Option<LocationId>) -> PendingLoad {
        let generation = self.next_generation();
        self.tiers.insert(
            tier,
            TierOptions {
                status: TierStatus::Loading,
                items: Vec::new(),
                generation,
            },
        );
        self.emit(LocationEvent::OptionsLoading { tier });
        PendingLoad {
            tier,
            parent,
            generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn node(id: &str, tier: LocationTier, parent: Option<&str>) -> LocationNode {
        LocationNode::new(id, tier, format!("{} name", id), parent.map(LocationId::from))
    }

    fn states() -> Vec<LocationNode> {
        vec![
            node("S1", LocationTier::State, Some("IN")),
            node("S2", LocationTier::State, Some("IN")),
        ]
    }

    fn clusters_of(state: &str) -> Vec<LocationNode> {
        match state {
            "S1" => vec![
                node("C1", LocationTier::Cluster, Some("S1")),
                node("C2", LocationTier::Cluster, Some("S1")),
            ],
            "S2" => vec![node("C3", LocationTier::Cluster, Some("S2"))],
            _ => vec![],
        }
    }

    fn districts_of(cluster: &str) -> Vec<LocationNode> {
        match cluster {
            "C1" => vec![node("D1", LocationTier::District, Some("C1"))],
            "C2" => vec![node("D2", LocationTier::District, Some("C2"))],
            "C3" => vec![node("D3", LocationTier::District, Some("C3"))],
            _ => vec![],
        }
    }

    fn answer(pending: &PendingLoad) -> Vec<LocationNode> {
        let parent = pending.parent.as_ref().map(|p| p.as_str()).unwrap_or("");
        match pending.tier {
            LocationTier::Country => vec![node("IN", LocationTier::Country, None)],
            LocationTier::State => states(),
            LocationTier::Cluster => clusters_of(parent),
            LocationTier::District => districts_of(parent),
        }
    }

    fn resolve(c: &mut LocationHierarchyController, pending: Option<PendingLoad>) {
        let pending = pending.expect("load expected");
        let result = answer(&pending);
        c.complete_load(&pending, Ok(result));
    }

    fn started() -> LocationHierarchyController {
        let mut c = LocationHierarchyController::new(HierarchyRoot::State);
        let p = c.start();
        resolve(&mut c, Some(p));
        c
    }

    fn id(s: &str) -> Option<LocationId> {
        Some(LocationId::from(s))
    }

    #[test]
    fn test_scenario_new_state_resets_cluster_and_district() {
        let mut c = started();
        let p = c.select_state(id("S1")).unwrap();
        resolve(&mut c, p);
        let p = c.select_cluster(id("C1")).unwrap();
        resolve(&mut c, p);
        c.select_district(id("D1")).unwrap();
        assert_eq!(c.selection().district, id("D1"));

        let p = c.select_state(id("S2")).unwrap().unwrap();
        assert_eq!(c.selection().state, id("S2"));
        assert_eq!(c.selection().cluster, None);
        assert_eq!(c.selection().district, None);
        assert_eq!(p.tier, LocationTier::Cluster);
        assert_eq!(p.parent, id("S2"));

        let clusters = c.options(LocationTier::Cluster).unwrap();
        assert!(clusters.is_loading());
        assert!(clusters.items.is_empty());
        let districts = c.options(LocationTier::District).unwrap();
        assert_eq!(districts.status, TierStatus::Idle);
    }

    #[test]
    fn test_stale_cluster_load_is_dropped() {
        let mut c = started();
        let first = c.select_state(id("S1")).unwrap().unwrap();
        let second = c.select_state(id("S2")).unwrap().unwrap();
        assert!(second.generation > first.generation);

        let outcome = c.complete_load(&first, Ok(clusters_of("S1")));
        assert_eq!(outcome, LoadOutcome::Stale);
        let clusters = c.options(LocationTier::Cluster).unwrap();
        assert!(clusters.items.is_empty());
        assert!(clusters.is_loading());

        let outcome = c.complete_load(&second, Ok(clusters_of("S2")));
        assert_eq!(
            outcome,
            LoadOutcome::Applied {
                tier: LocationTier::Cluster,
                count: 1
            }
        );
        assert!(c.options(LocationTier::Cluster).unwrap().contains(&"C3".into()));
    }

    #[test]
    fn test_stale_failure_is_not_surfaced() {
        let mut c = started();
        let first = c.select_state(id("S1")).unwrap().unwrap();
        let _second = c.select_state(id("S2")).unwrap().unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        c.subscribe(move |e| sink.lock().unwrap().push(e.clone()));

        let outcome = c.complete_load(&first, Err("timeout".into()));
        assert_eq!(outcome, LoadOutcome::Stale);
        assert!(events.lock().unwrap().is_empty());
        assert_eq!(c.options(LocationTier::Cluster).unwrap().error(), None);
    }

    #[test]
    fn test_cluster_without_state_is_rejected() {
        let mut c = started();
        let err = c.select_cluster(id("C1")).unwrap_err();
        assert!(matches!(
            err,
            LocationError::InconsistentSelection {
                tier: LocationTier::Cluster,
                ..
            }
        ));
        assert!(c.selection().is_empty());
    }

    #[test]
    fn test_cluster_of_other_state_is_rejected() {
        let mut c = started();
        let p = c.select_state(id("S1")).unwrap();
        resolve(&mut c, p);
        let before = c.selection().clone();
        assert!(c.select_cluster(id("C3")).is_err());
        assert_eq!(c.selection(), &before);
    }

    #[test]
    fn test_cluster_rejected_while_options_loading() {
        let mut c = started();
        c.select_state(id("S1")).unwrap();
        assert!(c.select_cluster(id("C1")).is_err());
    }

    #[test]
    fn test_failed_load_keeps_selection() {
        let mut c = started();
        let p = c.select_state(id("S1")).unwrap().unwrap();
        let outcome = c.complete_load(&p, Err("HTTP 500".into()));
        match outcome {
            LoadOutcome::Failed(LocationError::DependentLoadFailed { tier, message }) => {
                assert_eq!(tier, LocationTier::Cluster);
                assert_eq!(message, "HTTP 500");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(c.selection().state, id("S1"));
        let clusters = c.options(LocationTier::Cluster).unwrap();
        assert_eq!(clusters.error(), Some("HTTP 500"));
        assert!(clusters.items.is_empty());
        // state list still usable
        assert_eq!(c.options(LocationTier::State).unwrap().items.len(), 2);
    }

    #[test]
    fn test_retry_after_failure() {
        let mut c = started();
        let p = c.select_state(id("S1")).unwrap().unwrap();
        c.complete_load(&p, Err("offline".into()));
        let retry = c.retry(LocationTier::Cluster);
        assert_eq!(retry.as_ref().map(|p| p.parent.clone()), Some(id("S1")));
        resolve(&mut c, retry);
        assert_eq!(c.options(LocationTier::Cluster).unwrap().items.len(), 2);
        assert_eq!(c.retry(LocationTier::District), None);
    }

    #[test]
    fn test_reload_clears_selection_at_and_below_tier() {
        let mut c = started();
        let p = c.select_state(id("S1")).unwrap();
        resolve(&mut c, p);
        let p = c.select_cluster(id("C1")).unwrap();
        resolve(&mut c, p);
        c.select_district(id("D1")).unwrap();

        let reload = c.retry(LocationTier::Cluster).unwrap();
        assert_eq!(reload.parent, id("S1"));
        assert_eq!(c.selection().state, id("S1"));
        assert_eq!(c.selection().cluster, None);
        assert_eq!(c.selection().district, None);
        assert_eq!(
            c.options(LocationTier::District).unwrap().status,
            TierStatus::Idle
        );

        // C1 disappeared from the reloaded list: nothing points at it
        c.complete_load(
            &reload,
            Ok(vec![node("C2", LocationTier::Cluster, Some("S1"))]),
        );
        assert!(c.select_cluster(id("C1")).is_err());
        assert!(c.select_cluster(id("C2")).unwrap().is_some());

        let root = c.start();
        assert_eq!(root.tier, LocationTier::State);
        assert!(c.selection().is_empty());
    }

    #[test]
    fn test_deselect_state_clears_descendants_without_load() {
        let mut c = started();
        let p = c.select_state(id("S1")).unwrap();
        resolve(&mut c, p);
        let p = c.select_cluster(id("C2")).unwrap();
        assert!(p.is_some());
        let none = c.select_state(None).unwrap();
        assert!(none.is_none());
        assert!(c.selection().is_empty());
        assert_eq!(
            c.options(LocationTier::Cluster).unwrap().status,
            TierStatus::Idle
        );
        // in-flight district load became stale
        assert_eq!(
            c.complete_load(&p.unwrap(), Ok(districts_of("C2"))),
            LoadOutcome::Stale
        );
    }

    #[test]
    fn test_blank_id_is_deselect() {
        let mut c = started();
        let p = c.select_state(id("S1")).unwrap();
        resolve(&mut c, p);
        assert!(c.select_state(id("  ")).unwrap().is_none());
        assert_eq!(c.selection().state, None);
    }

    #[test]
    fn test_reset_keeps_root_options() {
        let mut c = started();
        let p = c.select_state(id("S1")).unwrap().unwrap();
        c.reset();
        assert!(c.selection().is_empty());
        assert_eq!(c.options(LocationTier::State).unwrap().items.len(), 2);
        assert_eq!(
            c.options(LocationTier::Cluster).unwrap().status,
            TierStatus::Idle
        );
        assert_eq!(c.complete_load(&p, Ok(clusters_of("S1"))), LoadOutcome::Stale);
    }

    #[test]
    fn test_inactive_and_foreign_nodes_are_not_offered() {
        let mut c = started();
        let p = c.select_state(id("S1")).unwrap().unwrap();
        let mut inactive = node("C9", LocationTier::Cluster, Some("S1"));
        inactive.is_active = false;
        let foreign = node("C3", LocationTier::Cluster, Some("S2"));
        let mut nodes = clusters_of("S1");
        nodes.push(inactive);
        nodes.push(foreign);
        c.complete_load(&p, Ok(nodes));
        let clusters = c.options(LocationTier::Cluster).unwrap();
        assert_eq!(clusters.items.len(), 2);
        assert!(!clusters.contains(&"C9".into()));
        assert!(!clusters.contains(&"C3".into()));
    }

    #[test]
    fn test_country_root_requires_country() {
        let mut c = LocationHierarchyController::new(HierarchyRoot::Country);
        let p = c.start();
        assert_eq!(p.tier, LocationTier::Country);
        resolve(&mut c, Some(p));
        assert!(c.select_state(id("S1")).is_err());

        let p = c.select_country(id("IN")).unwrap().unwrap();
        assert_eq!(p.tier, LocationTier::State);
        assert_eq!(p.parent, id("IN"));
        resolve(&mut c, Some(p));
        assert!(c.select_state(id("S1")).unwrap().is_some());
    }

    #[test]
    fn test_country_not_available_on_state_root() {
        let mut c = started();
        assert!(c.select_country(id("IN")).is_err());
        assert!(c.options(LocationTier::Country).is_none());
    }

    #[test]
    fn test_listeners_receive_events_until_unsubscribed() {
        let mut c = started();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let sub = c.subscribe(move |e| sink.lock().unwrap().push(e.clone()));

        let p = c.select_state(id("S1")).unwrap();
        resolve(&mut c, p);
        let p = c.select_cluster(id("C1")).unwrap();
        resolve(&mut c, p);
        c.select_district(id("D1")).unwrap();

        {
            let events = events.lock().unwrap();
            assert!(events.contains(&LocationEvent::OptionsLoading {
                tier: LocationTier::Cluster
            }));
            assert!(events.contains(&LocationEvent::OptionsLoaded {
                tier: LocationTier::District,
                count: 1
            }));
            assert!(matches!(
                events.last(),
                Some(LocationEvent::SelectionComplete(sel)) if sel.district == id("D1")
            ));
        }

        assert!(c.unsubscribe(sub));
        let seen = events.lock().unwrap().len();
        c.reset();
        assert_eq!(events.lock().unwrap().len(), seen);
    }

    /// Случайная последовательность операций не нарушает инвариант родителей
    #[test]
    fn test_selected_levels_always_chain_to_parent() {
        let parent_of = |child: &LocationId| -> Option<String> {
            states()
                .into_iter()
                .chain(["S1", "S2"].iter().flat_map(|s| clusters_of(s)))
                .chain(["C1", "C2", "C3"].iter().flat_map(|c| districts_of(c)))
                .find(|n| &n.id == child)
                .and_then(|n| n.parent_id.map(|p| p.0))
        };
        let ids = ["S1", "S2", "C1", "C2", "C3", "D1", "D2", "D3", ""];

        let mut c = started();
        let mut in_flight: Vec<PendingLoad> = Vec::new();
        let mut seed: u64 = 0x2545_f491;
        for _ in 0..500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let pick = (seed >> 33) as usize;
            let target = id(ids[pick % ids.len()]);
            match pick % 7 {
                0 => in_flight.extend(c.select_state(target).ok().flatten()),
                1 | 2 => in_flight.extend(c.select_cluster(target).ok().flatten()),
                3 => {
                    let _ = c.select_district(target);
                }
                4 => c.reset(),
                _ => {
                    // resolve a random in-flight load, possibly out of order
                    if !in_flight.is_empty() {
                        let p = in_flight.remove(pick % in_flight.len());
                        let result = answer(&p);
                        c.complete_load(&p, Ok(result));
                    }
                }
            }

            let sel = c.selection();
            if let Some(cluster) = &sel.cluster {
                let state = sel.state.as_ref().expect("cluster without state");
                assert_eq!(parent_of(cluster).as_deref(), Some(state.as_str()));
            }
            if let Some(district) = &sel.district {
                let cluster = sel.cluster.as_ref().expect("district without cluster");
                assert_eq!(parent_of(district).as_deref(), Some(cluster.as_str()));
            }
        }
    }
}
