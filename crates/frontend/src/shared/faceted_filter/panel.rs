use contracts::shared::faceted_filter::Locatable;
use leptos::prelude::*;
use thaw::*;

use super::handle::{FacetFilterHandle, FacetView};
use crate::shared::components::filter_panel::{FilterPanel, FilterTag};

/// Панель фасетного фильтра: группа флажков на фасет, чипы выбранных
/// значений и сброс. Варианты фасета не сужаются его собственным выбором,
/// поэтому внутри группы можно выбрать несколько значений.
#[component]
pub fn FacetFilterPanel<R>(filter: FacetFilterHandle<R>) -> impl IntoView
where
    R: Locatable + Clone + Send + Sync + 'static,
{
    let is_expanded = RwSignal::new(true);
    let active_count = Signal::derive(move || filter.active_filters_count());

    view! {
        <FilterPanel
            is_expanded=is_expanded
            active_filters_count=active_count
            summary=move || view! {
                <span class="filter-panel__summary">
                    {move || format!("{} из {}", filter.filtered().len(), filter.total())}
                </span>
            }
            filter_content=move || view! {
                <div class="facet-groups">
                    {move || {
                        filter
                            .facet_views()
                            .into_iter()
                            .map(|facet| view! { <FacetGroup filter=filter facet=facet /> })
                            .collect_view()
                    }}
                    <Button
                        appearance=ButtonAppearance::Secondary
                        disabled=Signal::derive(move || filter.active_filters_count() == 0)
                        on_click=move |_| filter.clear_all()
                    >
                        "Сбросить фильтры"
                    </Button>
                </div>
            }
            filter_tags=move || view! {
                <div class="filter-tags">
                    {move || {
                        filter
                            .facet_views()
                            .into_iter()
                            .flat_map(|facet| {
                                let name = facet.name.clone();
                                facet.selected.into_iter().map(move |value| {
                                    let label = format!("{}: {}", facet.label, value);
                                    let (name, value) = (name.clone(), value.clone());
                                    view! {
                                        <FilterTag
                                            label=label
                                            on_remove=Callback::new(move |_| filter.toggle(&name, &value))
                                        />
                                    }
                                })
                                .collect::<Vec<_>>()
                            })
                            .collect_view()
                    }}
                </div>
            }
        />
    }
}

#[component]
fn FacetGroup<R>(filter: FacetFilterHandle<R>, facet: FacetView) -> impl IntoView
where
    R: Locatable + Clone + Send + Sync + 'static,
{
    let FacetView {
        name,
        label,
        options,
        selected,
    } = facet;
    let has_selection = !selected.is_empty();
    let clear_name = name.clone();

    view! {
        <div class="facet-group">
            <div class="facet-group__header">
                <span class="facet-group__label">{label}</span>
                {has_selection.then(|| view! {
                    <button
                        class="facet-group__clear"
                        on:click=move |_| filter.clear_facet(&clear_name)
                    >
                        "×"
                    </button>
                })}
            </div>
            {if options.is_empty() {
                view! { <span class="facet-group__empty">"Нет вариантов"</span> }.into_any()
            } else {
                options
                    .into_iter()
                    .map(|option| {
                        let checked = selected.contains(&option);
                        let (name, value) = (name.clone(), option.clone());
                        view! {
                            <label class="facet-option">
                                <input
                                    type="checkbox"
                                    prop:checked=checked
                                    on:change=move |_| filter.toggle(&name, &value)
                                />
                                <span>{option}</span>
                            </label>
                        }
                    })
                    .collect_view()
                    .into_any()
            }}
        </div>
    }
}
