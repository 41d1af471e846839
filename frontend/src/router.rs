use yew::prelude::*;
use yew_router::prelude::*;

use crate::{
    components::{
        header::Header,
        loading_spinner::{LoadingSpinner, SpinnerSize},
    },
    pages,
    session::use_session,
};

#[derive(Routable, Clone, PartialEq, Debug)]
pub enum Route {
    #[at("/")]
    Dashboard,

    #[at("/login")]
    Login,

    #[not_found]
    #[at("/404")]
    NotFound,
}

#[derive(Properties, PartialEq)]
pub struct ProtectedRouteProps {
    #[prop_or_default]
    pub children: Children,
}

/// Renders its children inside the main layout for moderators; everyone
/// else goes to the login page.
#[function_component(ProtectedRoute)]
pub fn protected_route(props: &ProtectedRouteProps) -> Html {
    let Some(session) = use_session() else {
        return html! { <Redirect<Route> to={Route::Login} /> };
    };

    if session.is_authenticated() {
        return html! {
            <div class="app-shell">
                <Header />
                <main class="app-main">
                    { props.children.clone() }
                </main>
            </div>
        };
    }
    if session.checking {
        return html! { <LoadingSpinner size={SpinnerSize::Large} fullscreen={true} /> };
    }
    html! { <Redirect<Route> to={Route::Login} /> }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Dashboard => html! {
            <ProtectedRoute>
                <pages::dashboard::DashboardPage />
            </ProtectedRoute>
        },
        Route::Login => html! { <pages::login::LoginPage /> },
        Route::NotFound => html! { <pages::not_found::NotFoundPage /> },
    }
}

#[function_component(AppRouter)]
pub fn app_router() -> Html {
    html! {
        <BrowserRouter>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}
