use std::cell::RefCell;
use std::rc::Rc;

use contracts::domain::a001_location::{LocationId, LocationSelection, LocationTier};
use contracts::shared::location_hierarchy::{
    load_pending, HierarchyRoot, LoadOutcome, LocationEvent, LocationHierarchyController,
    LocationSnapshot, PendingLoad, TierOptions,
};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use super::directory::HttpLocationDirectory;

type SharedController = Rc<RefCell<LocationHierarchyController>>;

/// Экземпляр выбора локации для одного экрана.
///
/// Контроллер живёт в `StoredValue`, его состояние зеркалируется в сигнал
/// после каждого изменения. Загрузки уходят через `spawn_local`; пока запрос
/// в полёте, выбор можно менять, устаревший ответ контроллер отбросит.
#[derive(Clone, Copy)]
pub struct LocationHierarchyHandle {
    controller: StoredValue<SharedController, LocalStorage>,
    snapshot: RwSignal<LocationSnapshot>,
    last_error: RwSignal<Option<String>>,
}

impl LocationHierarchyHandle {
    pub fn new(root: HierarchyRoot) -> Self {
        let mut controller = LocationHierarchyController::new(root);
        controller.subscribe(|event| match event {
            LocationEvent::LoadFailed(e) => log::warn!("location load failed: {}", e),
            LocationEvent::SelectionComplete(sel) => {
                log::debug!("location selection complete: {:?}", sel.deepest())
            }
            other => log::trace!("location event: {:?}", other),
        });
        let snapshot = RwSignal::new(controller.snapshot());
        Self {
            controller: StoredValue::new_local(Rc::new(RefCell::new(controller))),
            snapshot,
            last_error: RwSignal::new(None),
        }
    }

    /// Создать и сразу запросить список корневого уровня
    pub fn started(root: HierarchyRoot) -> Self {
        let handle = Self::new(root);
        handle.start();
        handle
    }

    pub fn root(&self) -> HierarchyRoot {
        self.with_controller(|c| c.root()).unwrap_or_default()
    }

    pub fn snapshot(&self) -> ReadSignal<LocationSnapshot> {
        self.snapshot.read_only()
    }

    /// Текущий выбор (реактивно)
    pub fn selection(&self) -> LocationSelection {
        self.snapshot.with(|s| s.selection.clone())
    }

    /// Список вариантов уровня (реактивно)
    pub fn options(&self, tier: LocationTier) -> TierOptions {
        self.snapshot
            .with(|s| s.options(tier).cloned())
            .unwrap_or_default()
    }

    /// Последняя отклонённая попытка выбора
    pub fn last_error(&self) -> Option<String> {
        self.last_error.get()
    }

    pub fn start(&self) {
        if let Some(pending) = self.with_controller(|c| c.start()) {
            self.sync();
            self.dispatch(pending);
        }
    }

    /// Выбор из UI: пустая строка снимает выбор уровня
    pub fn select(&self, tier: LocationTier, raw_id: String) {
        let id = Some(LocationId::from(raw_id)).filter(|id| !id.is_blank());
        let Some(result) = self.with_controller(|c| c.select(tier, id)) else {
            return;
        };
        match result {
            Ok(pending) => {
                self.last_error.set(None);
                self.sync();
                if let Some(pending) = pending {
                    self.dispatch(pending);
                }
            }
            Err(e) => {
                log::warn!("{}", e);
                self.last_error.set(Some(e.to_string()));
            }
        }
    }

    pub fn reset(&self) {
        if self.with_controller(|c| c.reset()).is_some() {
            self.last_error.set(None);
            self.sync();
        }
    }

    pub fn retry(&self, tier: LocationTier) {
        if let Some(Some(pending)) = self.with_controller(|c| c.retry(tier)) {
            self.sync();
            self.dispatch(pending);
        }
    }

    fn with_controller<T>(&self, f: impl FnOnce(&mut LocationHierarchyController) -> T) -> Option<T> {
        let controller = self.controller.try_get_value()?;
        let result = f(&mut controller.borrow_mut());
        Some(result)
    }

    fn sync(&self) {
        if let Some(snapshot) = self.with_controller(|c| c.snapshot()) {
            self.snapshot.set(snapshot);
        }
    }

    fn dispatch(&self, pending: PendingLoad) {
        let Some(controller) = self.controller.try_get_value() else {
            return;
        };
        let snapshot = self.snapshot;
        spawn_local(async move {
            let outcome = load_pending(&controller, &HttpLocationDirectory, pending).await;
            if outcome != LoadOutcome::Stale {
                // Экран мог быть закрыт, пока шёл запрос
                let _ = snapshot.try_set(controller.borrow().snapshot());
            }
        });
    }
}
