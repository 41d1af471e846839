use modconsole_shared::Verification;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{
    components::theme_toggle::ThemeToggle,
    i18n::current::{common as common_text, header as t},
    router::Route,
    session::use_session,
};

#[function_component(Header)]
pub fn header() -> Html {
    let session = use_session();
    let navigator = use_navigator();
    let logging_out = use_state(|| false);

    let on_logout = {
        let session = session.clone();
        let logging_out = logging_out.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(session) = session.clone() else {
                return;
            };
            if *logging_out {
                return;
            }
            logging_out.set(true);
            let navigator = navigator.clone();
            let logging_out = logging_out.clone();
            wasm_bindgen_futures::spawn_local(async move {
                session.store.logout(session.api.as_ref()).await;
                session.sync.emit(());
                logging_out.set(false);
                if let Some(navigator) = navigator {
                    navigator.push(&Route::Login);
                }
            });
        })
    };

    let user = session.as_ref().and_then(|session| {
        session.identity().map(|identity| {
            let badge = match session.store.verification() {
                Some(Verification::Degraded) => html! {
                    <span class="badge badge-warning" title={t::OFFLINE_TOOLTIP}>{ t::OFFLINE_BADGE }</span>
                },
                Some(Verification::Simulated) => html! {
                    <span class="badge badge-muted">{ t::SIMULATED_BADGE }</span>
                },
                _ => Html::default(),
            };
            html! {
                <span class="header-user" title={identity.email.clone()}>
                    <span class="sr-only">{ t::SIGNED_IN_AS }</span>
                    <i class="fas fa-user-shield" aria-hidden="true"></i>
                    { identity.display_name().to_string() }
                    { badge }
                </span>
            }
        })
    });

    html! {
        <header class="app-header">
            <Link<Route> to={Route::Dashboard} classes={classes!("app-title")}>
                <i class="fas fa-shield-halved" aria-hidden="true"></i>
                { common_text::APP_TITLE }
            </Link<Route>>
            <div class="header-actions">
                { user.unwrap_or_default() }
                <ThemeToggle />
                <button
                    type="button"
                    class="btn btn-secondary"
                    onclick={on_logout}
                    disabled={*logging_out}
                >
                    <i class="fas fa-right-from-bracket" aria-hidden="true"></i>
                    { t::LOGOUT }
                </button>
            </div>
        </header>
    }
}
