//! `localStorage` access for the cached identity and the theme.

use modconsole_shared::{
    models::UserIdentity,
    persist::{self, IdentityCache, Theme, IDENTITY_STORAGE_KEY, THEME_STORAGE_KEY},
};
use web_sys::{MediaQueryList, Storage};

fn local_storage() -> Option<Storage> {
    web_sys::window().and_then(|win| win.local_storage().ok().flatten())
}

fn read(key: &str) -> Option<String> {
    local_storage().and_then(|storage| storage.get_item(key).ok().flatten())
}

fn write(key: &str, value: &str) {
    if let Some(storage) = local_storage() {
        if storage.set_item(key, value).is_err() {
            crate::api::console_error(&format!("failed to write `{key}` to localStorage"));
        }
    }
}

fn remove(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

/// Identity cache under the `user` key.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageIdentityCache;

impl IdentityCache for LocalStorageIdentityCache {
    fn load(&self) -> Option<UserIdentity> {
        read(IDENTITY_STORAGE_KEY).and_then(|raw| persist::decode(&raw))
    }

    fn save(&self, identity: &UserIdentity) {
        match persist::encode(identity) {
            Ok(raw) => write(IDENTITY_STORAGE_KEY, &raw),
            Err(err) => crate::api::console_error(&format!("failed to encode identity: {err}")),
        }
    }

    fn clear(&self) {
        remove(IDENTITY_STORAGE_KEY);
    }
}

/// Saved preference, else the system colour scheme.
pub fn load_theme() -> Theme {
    saved_theme().unwrap_or_else(system_theme)
}

pub fn saved_theme() -> Option<Theme> {
    read(THEME_STORAGE_KEY).and_then(|raw| persist::decode(&raw))
}

/// The `prefers-color-scheme: dark` media query, when the browser has one.
pub fn dark_scheme_query() -> Option<MediaQueryList> {
    web_sys::window()
        .and_then(|win| win.match_media("(prefers-color-scheme: dark)").ok().flatten())
}

fn system_theme() -> Theme {
    theme_for_scheme(dark_scheme_query().is_some_and(|query| query.matches()))
}

pub fn theme_for_scheme(prefers_dark: bool) -> Theme {
    if prefers_dark {
        Theme::Dark
    } else {
        Theme::Light
    }
}

pub fn save_theme(theme: Theme) {
    if let Ok(raw) = persist::encode(&theme) {
        write(THEME_STORAGE_KEY, &raw);
    }
}

/// Put the theme on `<html>` as both `data-theme` and a class.
pub fn apply_theme(theme: Theme) {
    let Some(root) = web_sys::window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.document_element())
    else {
        return;
    };
    let _ = root.set_attribute("data-theme", theme.as_str());
    let classes = root.class_list();
    let _ = classes.remove_1(theme.toggled().as_str());
    let _ = classes.add_1(theme.as_str());
}
