//! Runtime configuration resolved from flags and environment.

use std::{path::PathBuf, time::Duration};

use modconsole_shared::{client::DEFAULT_REQUEST_TIMEOUT, ClientConfig};

use crate::cli::GlobalArgs;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";
pub const SESSION_FILE: &str = "session.json";
pub const COOKIE_FILE: &str = "cookies.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base: String,
    pub data_dir: PathBuf,
    pub mock: bool,
    pub dev_fallback: bool,
    pub request_timeout: Duration,
    pub json: bool,
}

impl Config {
    pub fn from_cli_and_env(args: &GlobalArgs) -> Self {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_cli_and_env`] with an explicit variable lookup.
    pub fn resolve(args: &GlobalArgs, env: impl Fn(&str) -> Option<String>) -> Self {
        let api_base = args
            .api_base
            .clone()
            .or_else(|| env("MODCONSOLE_API_URL"))
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let data_dir = args
            .data_dir
            .clone()
            .or_else(|| env("MODCONSOLE_HOME").map(PathBuf::from))
            .unwrap_or_else(|| {
                env("HOME")
                    .map(|home| PathBuf::from(home).join(".modconsole"))
                    .unwrap_or_else(|| PathBuf::from(".modconsole"))
            });

        let request_timeout = args
            .timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Self {
            api_base,
            data_dir,
            mock: args.mock,
            dev_fallback: args.dev_fallback,
            request_timeout,
            json: args.json,
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    pub fn cookie_path(&self) -> PathBuf {
        self.data_dir.join(COOKIE_FILE)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            request_timeout: self.request_timeout,
            ..ClientConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_apply_without_flags_or_env() {
        let config = Config::resolve(&GlobalArgs::default(), env_of(&[("HOME", "/home/mod")]));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.data_dir, PathBuf::from("/home/mod/.modconsole"));
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.session_path(), PathBuf::from("/home/mod/.modconsole/session.json"));
    }

    #[test]
    fn flags_override_environment() {
        let args = GlobalArgs {
            api_base: Some("https://chat.example.com/api/".to_string()),
            timeout_secs: Some(5),
            ..GlobalArgs::default()
        };
        let env = env_of(&[
            ("MODCONSOLE_API_URL", "http://ignored"),
            ("MODCONSOLE_HOME", "/srv/modconsole"),
        ]);
        let config = Config::resolve(&args, env);

        assert_eq!(config.api_base, "https://chat.example.com/api");
        assert_eq!(config.data_dir, PathBuf::from("/srv/modconsole"));
        assert_eq!(config.client_config().request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn zero_timeout_falls_back_to_default() {
        let args = GlobalArgs {
            timeout_secs: Some(0),
            ..GlobalArgs::default()
        };
        let config = Config::resolve(&args, env_of(&[]));
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }
}
