//! Administrator session gate.
//!
//! The store is the only place that decides whether the console is
//! unlocked. Everything goes through its operations; the phase is never
//! assigned from outside.

use std::cell::{Cell, RefCell};

use crate::{
    api::ModerationApi,
    error::ApiError,
    models::{LoginRequest, UserIdentity, UserProfile},
    persist::IdentityCache,
};

/// How much the held identity has been checked against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Restored from the local cache, backend not asked yet.
    Unverified,
    /// The backend confirmed the identity.
    Confirmed,
    /// Restored identity kept because the backend could not be reached.
    Degraded,
    /// Local development session created while the backend was down.
    Simulated,
}

/// Session state machine:
/// `Unknown -> Authenticated(Unverified) -> Authenticated(Confirmed) | Anonymous`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing known yet.
    Unknown,
    /// No usable session.
    Anonymous,
    /// A moderator identity is held.
    Authenticated {
        /// The identity.
        identity: UserIdentity,
        /// How it was established.
        verification: Verification,
    },
}

/// Behaviour switches of the session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionConfig {
    /// Let `login` fall back to a simulated moderator session when the
    /// backend is unreachable. Development builds only.
    pub allow_simulated_login: bool,
}

/// Holds the current administrator session.
pub struct SessionStore<C> {
    cache: C,
    config: SessionConfig,
    phase: RefCell<SessionPhase>,
    generation: Cell<u64>,
}

impl<C: IdentityCache> SessionStore<C> {
    /// Store in the `Unknown` phase.
    pub fn new(cache: C, config: SessionConfig) -> Self {
        Self {
            cache,
            config,
            phase: RefCell::new(SessionPhase::Unknown),
            generation: Cell::new(0),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase.borrow().clone()
    }

    /// Held identity, if any.
    pub fn identity(&self) -> Option<UserIdentity> {
        match &*self.phase.borrow() {
            SessionPhase::Authenticated {
                identity, ..
            } => Some(identity.clone()),
            _ => None,
        }
    }

    /// How the held identity was established.
    pub fn verification(&self) -> Option<Verification> {
        match &*self.phase.borrow() {
            SessionPhase::Authenticated {
                verification, ..
            } => Some(*verification),
            _ => None,
        }
    }

    /// True iff an identity is held and it carries the moderator flag.
    pub fn is_authenticated(&self) -> bool {
        self.phase
            .borrow()
            .identity_ref()
            .is_some_and(|identity| identity.is_moderator)
    }

    /// The identity cache behind this store.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Optimistically adopt the cached identity before any network call.
    /// Returns whether an identity was adopted.
    pub fn restore(&self) -> bool {
        match self.cache.load() {
            Some(identity) if identity.is_moderator => {
                tracing::info!(user_id = identity.id, "restored cached session");
                self.transition(SessionPhase::Authenticated {
                    identity,
                    verification: Verification::Unverified,
                });
                true
            },
            Some(identity) => {
                tracing::warn!(user_id = identity.id, "dropping cached non-moderator identity");
                self.cache.clear();
                false
            },
            None => false,
        }
    }

    /// Ask the backend who we are. Never fails: problems end in
    /// `Anonymous`, except an unreachable backend while an identity is held,
    /// which keeps it as `Degraded`. A simulated session stays simulated.
    pub async fn verify<A>(&self, api: &A) -> SessionPhase
    where
        A: ModerationApi + ?Sized,
    {
        let started = self.generation.get();
        let result = api.current_user().await;
        if self.generation.get() != started {
            tracing::debug!("session changed while verifying; ignoring auth check result");
            return self.phase();
        }

        match result {
            Ok(Some(identity)) if identity.is_moderator => {
                self.cache.save(&identity);
                self.transition(SessionPhase::Authenticated {
                    identity,
                    verification: Verification::Confirmed,
                });
            },
            Ok(Some(identity)) => {
                tracing::warn!(user_id = identity.id, "current user is not a moderator");
                self.cache.clear();
                self.transition(SessionPhase::Anonymous);
            },
            Ok(None) => {
                self.cache.clear();
                self.transition(SessionPhase::Anonymous);
            },
            Err(err) if err.is_unreachable() => {
                tracing::warn!("auth check failed, backend unreachable: {err}");
                match self.phase() {
                    SessionPhase::Authenticated {
                        verification: Verification::Simulated,
                        ..
                    } => {},
                    SessionPhase::Authenticated {
                        identity, ..
                    } => self.transition(SessionPhase::Authenticated {
                        identity,
                        verification: Verification::Degraded,
                    }),
                    _ => self.transition(SessionPhase::Anonymous),
                }
            },
            Err(err) => {
                tracing::warn!("auth check failed: {err}");
                if err.is_auth_rejected() {
                    self.cache.clear();
                }
                self.transition(SessionPhase::Anonymous);
            },
        }
        self.phase()
    }

    /// Log in with email and password. Accounts without the moderator flag
    /// are refused with [`ApiError::AccessDenied`] and leave the store and
    /// its cache untouched.
    pub async fn login<A>(
        &self,
        api: &A,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<UserIdentity, ApiError>
    where
        A: ModerationApi + ?Sized,
    {
        let email = email.trim();
        if email.is_empty() {
            return Err(ApiError::Validation("Email is required".to_string()));
        }
        if password.is_empty() {
            return Err(ApiError::Validation("Password is required".to_string()));
        }

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            remember,
        };
        match api.login(&request).await {
            Ok(identity) if identity.is_moderator => {
                tracing::info!(user_id = identity.id, "moderator logged in");
                self.cache.save(&identity);
                self.transition(SessionPhase::Authenticated {
                    identity: identity.clone(),
                    verification: Verification::Confirmed,
                });
                Ok(identity)
            },
            Ok(identity) => {
                tracing::warn!(user_id = identity.id, "login refused: not a moderator");
                Err(ApiError::AccessDenied)
            },
            Err(err) if err.is_unreachable() && self.config.allow_simulated_login => {
                tracing::warn!("backend unreachable ({err}); using simulated moderator session");
                let identity = simulated_identity(email);
                self.transition(SessionPhase::Authenticated {
                    identity: identity.clone(),
                    verification: Verification::Simulated,
                });
                Ok(identity)
            },
            Err(err) => Err(err),
        }
    }

    /// Log out. Local state and cache are cleared whatever the backend says.
    pub async fn logout<A>(&self, api: &A)
    where
        A: ModerationApi + ?Sized,
    {
        let simulated = self.verification() == Some(Verification::Simulated);
        if !simulated {
            if let Err(err) = api.logout().await {
                tracing::warn!("error during logout: {err}");
            }
        }
        self.invalidate();
    }

    /// Drop the session locally, e.g. after the backend rejected a call.
    pub fn invalidate(&self) {
        self.cache.clear();
        self.transition(SessionPhase::Anonymous);
    }

    fn transition(&self, next: SessionPhase) {
        self.generation.set(self.generation.get().wrapping_add(1));
        *self.phase.borrow_mut() = next;
    }
}

impl SessionPhase {
    /// Borrow the held identity.
    pub fn identity_ref(&self) -> Option<&UserIdentity> {
        match self {
            SessionPhase::Authenticated {
                identity, ..
            } => Some(identity),
            _ => None,
        }
    }
}

fn simulated_identity(email: &str) -> UserIdentity {
    UserIdentity {
        id: 0,
        email: email.to_string(),
        username: "dev-moderator".to_string(),
        is_moderator: true,
        profile: Some(UserProfile {
            display_name: Some("Development Moderator".to_string()),
        }),
    }
}
