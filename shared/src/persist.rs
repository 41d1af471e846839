//! Versioned records kept in client-side storage.
//!
//! Only two things are persisted: the last known moderator identity (a
//! cache, never the source of truth) and the theme preference.

use std::cell::RefCell;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::models::UserIdentity;

/// Storage key of the cached identity.
pub const IDENTITY_STORAGE_KEY: &str = "user";
/// Storage key of the theme preference.
pub const THEME_STORAGE_KEY: &str = "theme";
/// Schema version written by this build.
pub const PERSISTED_SCHEMA_VERSION: u32 = 1;

/// Envelope around every stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persisted<T> {
    /// Schema version of `value`.
    pub version: u32,
    /// The stored value.
    pub value: T,
}

/// Serialize `value` under the current schema version.
pub fn encode<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Persisted {
        version: PERSISTED_SCHEMA_VERSION,
        value,
    })
}

/// Read a stored record. Unversioned records written by older builds are
/// accepted as version 0, either as bare JSON or as plain text such as a
/// theme saved as `dark`. Unknown versions and garbage read as absent.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Option<T> {
    #[derive(Deserialize)]
    struct Envelope {
        version: u32,
        value: serde_json::Value,
    }

    match serde_json::from_str::<Envelope>(raw) {
        Ok(Envelope {
            version: PERSISTED_SCHEMA_VERSION,
            value,
        }) => serde_json::from_value(value)
            .inspect_err(|err| tracing::warn!("discarding unreadable stored record: {err}"))
            .ok(),
        Ok(Envelope {
            version, ..
        }) => {
            tracing::warn!(version, "discarding stored record with unknown schema version");
            None
        },
        Err(_) => serde_json::from_str::<T>(raw)
            .or_else(|_| {
                serde_json::from_value::<T>(serde_json::Value::String(raw.trim().to_string()))
            })
            .inspect_err(|err| tracing::warn!("discarding unreadable stored record: {err}"))
            .ok(),
    }
}

/// Where the session store keeps its last known identity.
pub trait IdentityCache {
    /// Last saved identity, if any and readable.
    fn load(&self) -> Option<UserIdentity>;
    /// Replace the saved identity.
    fn save(&self, identity: &UserIdentity);
    /// Forget the saved identity.
    fn clear(&self);
}

/// Process-local cache, used by tests and by the mock data source setup.
#[derive(Debug, Default)]
pub struct MemoryIdentityCache {
    slot: RefCell<Option<String>>,
}

impl MemoryIdentityCache {
    /// Cache pre-filled with `identity`.
    pub fn with_identity(identity: &UserIdentity) -> Self {
        let cache = Self::default();
        cache.save(identity);
        cache
    }

    /// Cache pre-filled with an arbitrary raw record.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(raw.into())),
        }
    }

    /// The raw stored record.
    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl IdentityCache for MemoryIdentityCache {
    fn load(&self) -> Option<UserIdentity> {
        self.slot.borrow().as_deref().and_then(decode)
    }

    fn save(&self, identity: &UserIdentity) {
        match encode(identity) {
            Ok(raw) => *self.slot.borrow_mut() = Some(raw),
            Err(err) => tracing::warn!("failed to encode identity: {err}"),
        }
    }

    fn clear(&self) {
        self.slot.borrow_mut().take();
    }
}

/// Colour scheme of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light scheme.
    #[default]
    Light,
    /// Dark scheme.
    Dark,
}

impl Theme {
    /// Class applied to the document root.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// The other scheme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moderator() -> UserIdentity {
        UserIdentity {
            id: 1,
            email: "admin@example.com".to_string(),
            username: "admin".to_string(),
            is_moderator: true,
            profile: None,
        }
    }

    #[test]
    fn identity_survives_the_cache() {
        let cache = MemoryIdentityCache::with_identity(&moderator());
        assert_eq!(cache.load(), Some(moderator()));
        assert!(cache.raw().unwrap_or_default().contains("\"version\":1"));
        cache.clear();
        assert_eq!(cache.load(), None);
    }

    #[test]
    fn legacy_unversioned_record_is_read() {
        let raw = r#"{"id":1,"email":"admin@example.com","username":"admin","is_moderator":true}"#;
        let cache = MemoryIdentityCache::with_raw(raw);
        assert_eq!(cache.load(), Some(moderator()));
    }

    #[test]
    fn future_version_is_discarded() {
        let cache = MemoryIdentityCache::with_raw(r#"{"version":9,"value":{"id":1}}"#);
        assert_eq!(cache.load(), None);
    }

    #[test]
    fn garbage_is_discarded() {
        assert_eq!(decode::<UserIdentity>("not json"), None);
    }

    #[test]
    fn theme_record_uses_the_same_envelope() {
        let raw = encode(&Theme::Dark).expect("encode theme");
        assert_eq!(decode::<Theme>(&raw), Some(Theme::Dark));
        assert_eq!(decode::<Theme>("\"light\""), Some(Theme::Light));
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn plain_text_theme_from_older_builds_is_read() {
        assert_eq!(decode::<Theme>("dark"), Some(Theme::Dark));
        assert_eq!(decode::<Theme>("light\n"), Some(Theme::Light));
        assert_eq!(decode::<Theme>("sepia"), None);
    }
}
