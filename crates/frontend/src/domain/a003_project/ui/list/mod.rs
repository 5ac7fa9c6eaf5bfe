use contracts::domain::a001_location::LocationQuery;
use contracts::domain::a003_project::{project_facets, Project};
use contracts::shared::location_hierarchy::HierarchyRoot;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::domain::a003_project::api::fetch_projects;
use crate::shared::faceted_filter::{FacetFilterHandle, FacetFilterPanel};
use crate::shared::icons::icon;
use crate::shared::location_hierarchy::{LocationHierarchyHandle, LocationPickers};

/// Список проектов. Выбор локации уходит в запрос к backend,
/// фильтр по статусу применяется на клиенте.
#[component]
#[allow(non_snake_case)]
pub fn ProjectList() -> impl IntoView {
    let locations = LocationHierarchyHandle::started(HierarchyRoot::State);
    let filter: FacetFilterHandle<Project> = FacetFilterHandle::new(project_facets());
    let (error, set_error) = signal::<Option<String>>(None);
    let (is_loading, set_is_loading) = signal(false);
    // Номер последнего запроса: ответ на более ранний запрос не применяется
    let request_seq = StoredValue::new(0u64);

    Effect::new(move |_| {
        let query = LocationQuery::from(&locations.selection());
        request_seq.update_value(|n| *n += 1);
        let seq = request_seq.get_value();
        set_is_loading.set(true);
        spawn_local(async move {
            let result = fetch_projects(&query).await;
            if request_seq.try_get_value() != Some(seq) {
                log::debug!("dropping stale project list response #{}", seq);
                return;
            }
            match result {
                Ok(v) => {
                    filter.set_records(v);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_is_loading.set(false);
        });
    });

    let total_capacity = move || {
        filter
            .filtered()
            .iter()
            .map(|p| p.capacity_kw)
            .sum::<f64>()
    };

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    {icon("projects")}
                    <h1 class="header__title">"Проекты"</h1>
                </div>
            </div>

            {move || error.get().map(|e| view! {
                <div class="warning-box">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            })}

            <LocationPickers handle=locations />
            <FacetFilterPanel filter=filter />

            <table class="table">
                <thead>
                    <tr>
                        <th>"Код"</th>
                        <th>"Клиент"</th>
                        <th>"Мощность, кВт"</th>
                        <th>"Статус"</th>
                        <th>"Штат"</th>
                        <th>"Кластер / город"</th>
                        <th>"Район"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || filter.filtered()
                        key=|p| p.id.clone()
                        children=move |p: Project| view! {
                            <tr>
                                <td>{p.code.clone()}</td>
                                <td>{p.customer.clone()}</td>
                                <td class="table__cell--number">{format!("{:.1}", p.capacity_kw)}</td>
                                <td>{p.status.display_name()}</td>
                                <td>{p.state_id.clone()}</td>
                                <td>{p.cluster_id.clone()}</td>
                                <td>{p.district_id.clone().unwrap_or_else(|| "-".to_string())}</td>
                            </tr>
                        }
                    />
                </tbody>
                <tfoot>
                    <tr>
                        <td colspan="2">"Итого"</td>
                        <td class="table__cell--number">{move || format!("{:.1}", total_capacity())}</td>
                        <td colspan="4">
                            {move || is_loading.get().then(|| "Загрузка...")}
                        </td>
                    </tr>
                </tfoot>
            </table>
        </div>
    }
}
