use async_trait::async_trait;
use std::cell::RefCell;

use super::controller::{LoadOutcome, LocationHierarchyController, PendingLoad};
use crate::domain::a001_location::{LocationId, LocationNode, LocationTier};

/// Внешний справочник локаций.
///
/// На frontend реализуется HTTP-клиентом, в тестах - заглушкой в памяти.
/// Futures не обязаны быть `Send`: всё выполняется в одном потоке UI.
#[async_trait(?Send)]
pub trait LocationDirectory {
    async fn list_countries(&self) -> Result<Vec<LocationNode>, String>;

    /// `country == None` - экран, у которого корень иерархии State
    async fn list_states(&self, country: Option<&LocationId>) -> Result<Vec<LocationNode>, String>;

    async fn list_clusters(&self, state: &LocationId) -> Result<Vec<LocationNode>, String>;

    async fn list_districts(&self, cluster: &LocationId) -> Result<Vec<LocationNode>, String>;

    /// Выполнить загрузку, описанную тикетом контроллера
    async fn list_for(&self, pending: &PendingLoad) -> Result<Vec<LocationNode>, String> {
        match (pending.tier, pending.parent.as_ref()) {
            (LocationTier::Country, _) => self.list_countries().await,
            (LocationTier::State, parent) => self.list_states(parent).await,
            (LocationTier::Cluster, Some(state)) => self.list_clusters(state).await,
            (LocationTier::District, Some(cluster)) => self.list_districts(cluster).await,
            (tier, None) => Err(format!("no parent given for tier {}", tier)),
        }
    }
}

/// Довести тикет до конца: сходить в справочник и отдать результат контроллеру.
///
/// Контроллер не заимствуется на время ожидания, поэтому пока запрос в полёте
/// экран может менять выбор; устаревший ответ контроллер отбросит сам.
pub async fn load_pending<D>(
    controller: &RefCell<LocationHierarchyController>,
    directory: &D,
    pending: PendingLoad,
) -> LoadOutcome
where
    D: LocationDirectory + ?Sized,
{
    let result = directory.list_for(&pending).await;
    controller.borrow_mut().complete_load(&pending, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::location_hierarchy::HierarchyRoot;

    /// Справочник в памяти; `broken` - уровень, загрузка которого падает
    struct MemoryDirectory {
        nodes: Vec<LocationNode>,
        broken: Option<LocationTier>,
    }

    impl MemoryDirectory {
        fn children(
            &self,
            tier: LocationTier,
            parent: Option<&LocationId>,
        ) -> Result<Vec<LocationNode>, String> {
            if self.broken == Some(tier) {
                return Err(format!("{} unavailable", tier));
            }
            Ok(self
                .nodes
                .iter()
                .filter(|n| n.tier == tier)
                .filter(|n| parent.is_none() || n.parent_id.as_ref() == parent)
                .cloned()
                .collect())
        }
    }

    #[async_trait(?Send)]
    impl LocationDirectory for MemoryDirectory {
        async fn list_countries(&self) -> Result<Vec<LocationNode>, String> {
            self.children(LocationTier::Country, None)
        }

        async fn list_states(
            &self,
            country: Option<&LocationId>,
        ) -> Result<Vec<LocationNode>, String> {
            self.children(LocationTier::State, country)
        }

        async fn list_clusters(&self, state: &LocationId) -> Result<Vec<LocationNode>, String> {
            self.children(LocationTier::Cluster, Some(state))
        }

        async fn list_districts(&self, cluster: &LocationId) -> Result<Vec<LocationNode>, String> {
            self.children(LocationTier::District, Some(cluster))
        }
    }

    fn directory(broken: Option<LocationTier>) -> MemoryDirectory {
        let n = |id: &str, tier, parent: Option<&str>| {
            LocationNode::new(id, tier, id, parent.map(LocationId::from))
        };
        MemoryDirectory {
            nodes: vec![
                n("IN", LocationTier::Country, None),
                n("GJ", LocationTier::State, Some("IN")),
                n("RJ", LocationTier::State, Some("IN")),
                n("AHD", LocationTier::Cluster, Some("GJ")),
                n("SRT", LocationTier::Cluster, Some("GJ")),
                n("JPR", LocationTier::Cluster, Some("RJ")),
                n("SND", LocationTier::District, Some("AHD")),
            ],
            broken,
        }
    }

    #[tokio::test]
    async fn test_cascade_through_directory() {
        let dir = directory(None);
        let controller = RefCell::new(LocationHierarchyController::new(HierarchyRoot::Country));

        let p = controller.borrow_mut().start();
        load_pending(&controller, &dir, p).await;
        let p = controller
            .borrow_mut()
            .select_country(Some("IN".into()))
            .unwrap()
            .unwrap();
        load_pending(&controller, &dir, p).await;
        let p = controller
            .borrow_mut()
            .select_state(Some("GJ".into()))
            .unwrap()
            .unwrap();
        let outcome = load_pending(&controller, &dir, p).await;
        assert_eq!(
            outcome,
            LoadOutcome::Applied {
                tier: LocationTier::Cluster,
                count: 2
            }
        );
        let p = controller
            .borrow_mut()
            .select_cluster(Some("AHD".into()))
            .unwrap()
            .unwrap();
        load_pending(&controller, &dir, p).await;
        controller
            .borrow_mut()
            .select_district(Some("SND".into()))
            .unwrap();

        let c = controller.borrow();
        assert_eq!(c.selection().district, Some("SND".into()));
        assert_eq!(c.selection().cluster, Some("AHD".into()));
    }

    #[tokio::test]
    async fn test_out_of_order_responses() {
        let dir = directory(None);
        let controller = RefCell::new(LocationHierarchyController::new(HierarchyRoot::State));
        let p = controller.borrow_mut().start();
        load_pending(&controller, &dir, p).await;

        let gj = controller
            .borrow_mut()
            .select_state(Some("GJ".into()))
            .unwrap()
            .unwrap();
        let rj = controller
            .borrow_mut()
            .select_state(Some("RJ".into()))
            .unwrap()
            .unwrap();

        // newer request answers first
        let newer = load_pending(&controller, &dir, rj).await;
        let older = load_pending(&controller, &dir, gj).await;
        assert!(matches!(newer, LoadOutcome::Applied { count: 1, .. }));
        assert_eq!(older, LoadOutcome::Stale);

        let c = controller.borrow();
        let clusters = c.options(LocationTier::Cluster).unwrap();
        assert_eq!(clusters.items.len(), 1);
        assert_eq!(clusters.items[0].id, LocationId::from("JPR"));
    }

    #[tokio::test]
    async fn test_directory_failure_is_reported_for_tier() {
        let dir = directory(Some(LocationTier::Cluster));
        let controller = RefCell::new(LocationHierarchyController::new(HierarchyRoot::State));
        let p = controller.borrow_mut().start();
        load_pending(&controller, &dir, p).await;
        let p = controller
            .borrow_mut()
            .select_state(Some("GJ".into()))
            .unwrap()
            .unwrap();

        let outcome = load_pending(&controller, &dir, p).await;
        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        let c = controller.borrow();
        assert_eq!(c.selection().state, Some("GJ".into()));
        assert_eq!(
            c.options(LocationTier::Cluster).unwrap().error(),
            Some("cluster unavailable")
        );
    }
}
