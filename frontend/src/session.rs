//! Session context shared by every page.
//!
//! The [`SessionStore`] owns the state machine; this module only mirrors its
//! phase into Yew state so components re-render when it moves.

use std::rc::Rc;

use modconsole_shared::{
    models::UserIdentity,
    session::SessionConfig,
    ModerationApi, SessionPhase, SessionStore,
};
use yew::prelude::*;

use crate::{api::app_api, config::DEV_FALLBACK, storage::LocalStorageIdentityCache};

pub type AppSession = SessionStore<LocalStorageIdentityCache>;

#[derive(Clone)]
pub struct SessionContext {
    pub phase: SessionPhase,
    /// The initial current-user check is in flight.
    pub checking: bool,
    pub store: Rc<AppSession>,
    pub api: Rc<dyn ModerationApi>,
    /// Copy the store's phase into the context after an operation.
    pub sync: Callback<()>,
}

impl PartialEq for SessionContext {
    fn eq(&self, other: &Self) -> bool {
        self.phase == other.phase
            && self.checking == other.checking
            && Rc::ptr_eq(&self.store, &other.store)
    }
}

impl SessionContext {
    pub fn identity(&self) -> Option<&UserIdentity> {
        self.phase.identity_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some_and(|identity| identity.is_moderator)
    }
}

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    #[prop_or_default]
    pub children: Children,
}

#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let store = use_memo((), |_| {
        SessionStore::new(LocalStorageIdentityCache, SessionConfig {
            allow_simulated_login: DEV_FALLBACK,
        })
    });
    let api = use_state(app_api);
    let phase = use_state(|| SessionPhase::Unknown);
    let checking = use_state(|| true);

    let sync = {
        let store = store.clone();
        let phase = phase.clone();
        Callback::from(move |_: ()| phase.set(store.phase()))
    };

    {
        let store = store.clone();
        let api = (*api).clone();
        let sync = sync.clone();
        let checking = checking.clone();
        use_effect_with((), move |_| {
            store.restore();
            sync.emit(());
            wasm_bindgen_futures::spawn_local(async move {
                store.verify(api.as_ref()).await;
                sync.emit(());
                checking.set(false);
            });
            || ()
        });
    }

    let context = SessionContext {
        phase: (*phase).clone(),
        checking: *checking,
        store,
        api: (*api).clone(),
        sync,
    };

    html! {
        <ContextProvider<SessionContext> context={context}>
            { props.children.clone() }
        </ContextProvider<SessionContext>>
    }
}

/// Session context, or `None` outside a [`SessionProvider`].
#[hook]
pub fn use_session() -> Option<SessionContext> {
    use_context::<SessionContext>()
}
