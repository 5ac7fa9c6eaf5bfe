use contracts::domain::a002_supplier::{supplier_facets, Supplier};
use contracts::shared::location_hierarchy::HierarchyRoot;
use leptos::prelude::*;
use thaw::*;
use wasm_bindgen_futures::spawn_local;

use crate::domain::a002_supplier::api::fetch_suppliers;
use crate::shared::faceted_filter::{FacetFilterHandle, FacetFilterPanel};
use crate::shared::icons::icon;
use crate::shared::location_hierarchy::{LocationHierarchyHandle, LocationPickers};

fn dash(v: &Option<String>) -> String {
    v.as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("-")
        .to_string()
}

/// Обзор поставщиков: выбор штата/кластера/района и фасетный фильтр
/// работают над одним списком, загруженным целиком.
#[component]
#[allow(non_snake_case)]
pub fn SupplierOverview() -> impl IntoView {
    let locations = LocationHierarchyHandle::started(HierarchyRoot::State);
    let filter: FacetFilterHandle<Supplier> = FacetFilterHandle::new(supplier_facets());
    let (error, set_error) = signal::<Option<String>>(None);
    let (is_loading, set_is_loading) = signal(false);

    let fetch = move || {
        set_is_loading.set(true);
        spawn_local(async move {
            match fetch_suppliers().await {
                Ok(v) => {
                    filter.set_records(v);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_is_loading.set(false);
        });
    };

    // Выбор локации сужает записи так же, как фасеты
    Effect::new(move |_| {
        filter.set_location_scope(locations.selection());
    });

    fetch();

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    {icon("suppliers")}
                    <h1 class="header__title">"Поставщики"</h1>
                </div>
                <div class="header__actions">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        disabled=Signal::derive(move || is_loading.get())
                        on_click=move |_| fetch()
                    >
                        {icon("refresh")}
                        "Обновить"
                    </Button>
                </div>
            </div>

            {move || error.get().map(|e| view! {
                <div class="warning-box">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            })}

            <LocationPickers handle=locations show_reset=true />
            <FacetFilterPanel filter=filter />

            <table class="table">
                <thead>
                    <tr>
                        <th>"Код"</th>
                        <th>"Наименование"</th>
                        <th>"Тип"</th>
                        <th>"Продукт"</th>
                        <th>"Категория"</th>
                        <th>"Бренд"</th>
                        <th>"Штат"</th>
                        <th>"Кластер / город"</th>
                        <th>"Район"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || filter.filtered()
                        key=|s| s.id.clone()
                        children=move |s: Supplier| view! {
                            <tr>
                                <td>{s.code.clone()}</td>
                                <td>{s.name.clone()}</td>
                                <td>{s.supplier_type.clone()}</td>
                                <td>{s.product.clone()}</td>
                                <td>{s.category.clone()}</td>
                                <td>{dash(&s.brand)}</td>
                                <td>{s.state_id.clone()}</td>
                                <td>{dash(&s.cluster_id)}</td>
                                <td>{dash(&s.district_id)}</td>
                            </tr>
                        }
                    />
                </tbody>
            </table>
            {move || (!is_loading.get() && filter.filtered().is_empty()).then(|| view! {
                <div class="empty-state">"Нет поставщиков для выбранных условий"</div>
            })}
        </div>
    }
}
