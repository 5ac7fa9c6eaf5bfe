use crate::domain::a002_supplier::ui::overview::SupplierOverview;
use crate::domain::a003_project::ui::list::ProjectList;
use crate::shared::icons::icon;
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Suppliers,
    Projects,
}

impl Screen {
    fn title(&self) -> &'static str {
        match self {
            Screen::Suppliers => "Поставщики",
            Screen::Projects => "Проекты",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            Screen::Suppliers => "suppliers",
            Screen::Projects => "projects",
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    let active = RwSignal::new(Screen::Suppliers);

    view! {
        <div class="app">
            <nav class="tabs">
                {[Screen::Suppliers, Screen::Projects]
                    .into_iter()
                    .map(|screen| view! {
                        <button
                            class=move || if active.get() == screen { "tab tab--active" } else { "tab" }
                            on:click=move |_| active.set(screen)
                        >
                            {icon(screen.icon())}
                            <span>{screen.title()}</span>
                        </button>
                    })
                    .collect_view()}
            </nav>
            // Каждый экран создаёт свой выбор локации при монтировании
            <main class="app__content">
                {move || match active.get() {
                    Screen::Suppliers => view! { <SupplierOverview /> }.into_any(),
                    Screen::Projects => view! { <ProjectList /> }.into_any(),
                }}
            </main>
        </div>
    }
}
