pub mod admin;
pub mod auth;
pub mod reports;

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use modconsole_shared::{
    models::UserIdentity,
    persist::IdentityCache,
    session::SessionConfig,
    MockModerationApi, ModerationApi, RemoteClient, SessionPhase, SessionStore, Verification,
};
use serde::Serialize;

use crate::{
    cache::FileIdentityCache,
    cli::{Cli, Commands},
    config::Config,
    transport::ReqwestTransport,
};

/// Everything a subcommand needs: the resolved configuration, the data
/// source and the session gate.
pub struct App {
    pub config: Config,
    pub api: Box<dyn ModerationApi>,
    pub session: SessionStore<FileIdentityCache>,
}

impl App {
    pub fn from_config(config: Config) -> Result<Self> {
        let cache = FileIdentityCache::new(config.session_path());
        let api: Box<dyn ModerationApi> = if config.mock {
            tracing::info!("using in-memory mock data");
            let mock = MockModerationApi::seeded();
            Box::new(match cache.load() {
                Some(identity) => mock.with_session(identity),
                None => mock,
            })
        } else {
            let transport = ReqwestTransport::with_cookie_file(&config.api_base, config.cookie_path())?;
            Box::new(RemoteClient::with_config(transport, config.client_config()))
        };
        let session = SessionStore::new(
            cache,
            SessionConfig {
                allow_simulated_login: config.dev_fallback,
            },
        );
        Ok(Self {
            config,
            api,
            session,
        })
    }

    /// Restore and verify the session; fail unless a moderator is logged in.
    pub async fn require_session(&self) -> Result<UserIdentity> {
        self.session.restore();
        match self.session.verify(self.api.as_ref()).await {
            SessionPhase::Authenticated {
                identity,
                verification,
            } => {
                if verification == Verification::Degraded {
                    tracing::warn!("backend unreachable; continuing with cached session");
                }
                Ok(identity)
            },
            _ => bail!("not logged in as a moderator; run `modctl login <email>` first"),
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_cli_and_env(&cli.global);
    tracing::debug!(api_base = %config.api_base, data_dir = %config.data_dir.display(), "config resolved");
    let app = App::from_config(config)?;

    match cli.command {
        Commands::Ping => admin::ping(&app).await,
        Commands::Login {
            email,
            password,
            remember,
        } => {
            let password = match password.or_else(|| std::env::var("MODCONSOLE_PASSWORD").ok()) {
                Some(password) => password,
                None => prompt("Password: ")?,
            };
            auth::login(&app, &email, &password, remember).await
        },
        Commands::Logout => auth::logout(&app).await,
        Commands::Whoami => auth::whoami(&app).await,
        Commands::Reports {
            status,
        } => reports::list(&app, status.status()).await,
        Commands::Show(target) => reports::show(&app, target.key()).await,
        Commands::Delete {
            target,
            yes,
        } => {
            if !yes && !confirm(&format!("Delete {} message {}?", target.kind_label(), target.id))? {
                println!("Cancelled.");
                return Ok(());
            }
            reports::delete(&app, target.key()).await
        },
        Commands::Clear(target) => reports::clear(&app, target.key()).await,
        Commands::Mute {
            target,
            yes,
        } => {
            if !yes && !confirm("Block the author of this message?")? {
                println!("Cancelled.");
                return Ok(());
            }
            reports::mute(&app, target.key()).await
        },
        Commands::Blocked => admin::blocked(&app).await,
        Commands::Unblock {
            block_id,
        } => admin::unblock(&app, block_id).await,
        Commands::Stats => admin::stats(&app).await,
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{question} [y/N] "))?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
