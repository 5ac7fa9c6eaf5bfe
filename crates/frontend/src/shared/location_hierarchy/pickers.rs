use contracts::domain::a001_location::LocationTier;
use contracts::shared::location_hierarchy::TierStatus;
use leptos::prelude::*;
use thaw::*;

use super::handle::LocationHierarchyHandle;

/// Каскадные списки выбора локации: по одному на уровень, начиная с корня экрана.
/// Список уровня доступен, только когда выбран родитель и варианты загружены.
#[component]
pub fn LocationPickers(
    handle: LocationHierarchyHandle,
    /// Показывать кнопку сброса
    #[prop(optional)]
    show_reset: bool,
) -> impl IntoView {
    let tiers = handle.root().tiers();

    view! {
        <div class="location-pickers">
            {tiers
                .into_iter()
                .map(|tier| view! { <TierPicker handle=handle tier=tier /> })
                .collect_view()}
            {show_reset.then(|| view! {
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| handle.reset()>
                    "Сбросить"
                </Button>
            })}
            {move || handle.last_error().map(|e| view! {
                <span class="location-pickers__error">{e}</span>
            })}
        </div>
    }
}

#[component]
fn TierPicker(handle: LocationHierarchyHandle, tier: LocationTier) -> impl IntoView {
    let options = move || handle.options(tier);
    let selected = move || {
        handle
            .selection()
            .get(tier)
            .map(|id| id.0.clone())
            .unwrap_or_default()
    };
    let disabled = move || !matches!(options().status, TierStatus::Loaded);

    view! {
        <div class="location-picker">
            <label class="location-picker__label">{tier.display_name()}</label>
            <select
                class="location-picker__select"
                disabled=disabled
                prop:value=selected
                on:change=move |ev| handle.select(tier, event_target_value(&ev))
            >
                <option value="">"Все"</option>
                {move || {
                    options()
                        .items
                        .into_iter()
                        .map(|node| {
                            let id = node.id.0.clone();
                            let is_selected = id == selected();
                            view! {
                                <option value=id selected=is_selected>{node.name}</option>
                            }
                        })
                        .collect_view()
                }}
            </select>
            {move || match options().status {
                TierStatus::Loading => view! { <Spinner size=SpinnerSize::Small /> }.into_any(),
                TierStatus::Failed(message) => view! {
                    <span class="location-picker__error" title=message>
                        "Ошибка загрузки "
                        <Button size=ButtonSize::Small on_click=move |_| handle.retry(tier)>
                            "Повторить"
                        </Button>
                    </span>
                }
                .into_any(),
                _ => view! { <></> }.into_any(),
            }}
        </div>
    }
}
