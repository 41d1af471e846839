use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{
    components::{error_banner::ErrorBanner, theme_toggle::ThemeToggle},
    i18n::current::{common as common_text, login as t},
    router::Route,
    session::use_session,
};

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let session = use_session();
    let navigator = use_navigator();
    let email = use_state(String::new);
    let password = use_state(String::new);
    let remember = use_state(|| false);
    let error = use_state(|| None::<String>);
    let submitting = use_state(|| false);

    let on_email = {
        let email = email.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(target) = event.target_dyn_into::<HtmlInputElement>() {
                email.set(target.value());
            }
        })
    };
    let on_password = {
        let password = password.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(target) = event.target_dyn_into::<HtmlInputElement>() {
                password.set(target.value());
            }
        })
    };
    let on_remember = {
        let remember = remember.clone();
        Callback::from(move |event: Event| {
            if let Some(target) = event.target_dyn_into::<HtmlInputElement>() {
                remember.set(target.checked());
            }
        })
    };

    let onsubmit = {
        let session = session.clone();
        let email = email.clone();
        let password = password.clone();
        let remember = remember.clone();
        let error = error.clone();
        let submitting = submitting.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Some(session) = session.clone() else {
                return;
            };
            if *submitting {
                return;
            }
            submitting.set(true);
            error.set(None);

            let email = (*email).clone();
            let password = (*password).clone();
            let remember = *remember;
            let error = error.clone();
            let submitting = submitting.clone();
            let navigator = navigator.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = session
                    .store
                    .login(session.api.as_ref(), &email, &password, remember)
                    .await;
                submitting.set(false);
                match result {
                    Ok(_) => {
                        session.sync.emit(());
                        if let Some(navigator) = navigator {
                            navigator.replace(&Route::Dashboard);
                        }
                    },
                    Err(err) => {
                        crate::api::console_error(&format!("Login error: {err}"));
                        error.set(Some(err.user_message()));
                    },
                }
            });
        })
    };

    if session.as_ref().is_some_and(|session| session.is_authenticated()) {
        return html! { <Redirect<Route> to={Route::Dashboard} /> };
    }

    let on_close_error = {
        let error = error.clone();
        Callback::from(move |_: ()| error.set(None))
    };

    html! {
        <main class="login-page">
            <div class="login-card">
                <div class="login-card-head">
                    <h1>
                        <i class="fas fa-shield-halved" aria-hidden="true"></i>
                        { common_text::APP_TITLE }
                    </h1>
                    <ThemeToggle />
                </div>
                <h2>{ t::HEADING }</h2>
                <p class="muted">{ t::SUBHEADING }</p>

                if let Some(message) = (*error).clone() {
                    <ErrorBanner message={message} on_close={on_close_error} />
                }

                <form class="login-form" {onsubmit} novalidate={true}>
                    <label for="login-email">{ t::EMAIL_LABEL }</label>
                    <input
                        id="login-email"
                        type="email"
                        autocomplete="username"
                        placeholder={t::EMAIL_PLACEHOLDER}
                        value={(*email).clone()}
                        oninput={on_email}
                        disabled={*submitting}
                    />
                    <label for="login-password">{ t::PASSWORD_LABEL }</label>
                    <input
                        id="login-password"
                        type="password"
                        autocomplete="current-password"
                        value={(*password).clone()}
                        oninput={on_password}
                        disabled={*submitting}
                    />
                    <label class="checkbox">
                        <input type="checkbox" checked={*remember} onchange={on_remember} />
                        { t::REMEMBER_ME }
                    </label>
                    <button type="submit" class="btn btn-primary" disabled={*submitting}>
                        { if *submitting { t::SUBMITTING } else { t::SUBMIT } }
                    </button>
                </form>
            </div>
        </main>
    }
}
