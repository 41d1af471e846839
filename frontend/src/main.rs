//! Browser console for message moderators, built with Yew.

mod api;
mod components;
mod config;
mod i18n;
mod pages;
mod router;
mod session;
mod storage;
mod theme;

use yew::prelude::*;

#[function_component(App)]
fn app() -> Html {
    html! {
        <theme::ThemeProvider>
            <session::SessionProvider>
                <router::AppRouter />
            </session::SessionProvider>
        </theme::ThemeProvider>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
