//! File-backed identity cache (`session.json` in the data directory).

use std::path::{Path, PathBuf};

use modconsole_shared::{
    models::UserIdentity,
    persist::{decode, encode, IdentityCache},
};

#[derive(Debug, Clone)]
pub struct FileIdentityCache {
    path: PathBuf,
}

impl FileIdentityCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentityCache for FileIdentityCache {
    fn load(&self) -> Option<UserIdentity> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => decode(&raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "failed to read session record: {err}");
                None
            },
        }
    }

    fn save(&self, identity: &UserIdentity) {
        let raw = match encode(identity) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("failed to encode session record: {err}");
                return;
            },
        };
        let result = self
            .path
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|()| std::fs::write(&self.path, raw));
        if let Err(err) = result {
            tracing::warn!(path = %self.path.display(), "failed to write session record: {err}");
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %self.path.display(), "failed to remove session record: {err}");
            },
            _ => {},
        }
    }
}
