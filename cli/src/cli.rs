use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use modconsole_shared::models::{MessageKey, MessageType, ReportStatus};

/// Moderation console for the chat backend.
///
/// Connection settings come from flags or environment variables; flags
/// take precedence.
#[derive(Parser, Debug)]
#[command(name = "modctl", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Backend API base URL [env: MODCONSOLE_API_URL] [default: http://localhost:5000/api]
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Directory for the session record and cookies [env: MODCONSOLE_HOME] [default: ~/.modconsole]
    #[arg(long, short = 'd', global = true)]
    pub data_dir: Option<PathBuf>,

    /// Serve seeded in-memory data instead of calling the backend.
    #[arg(long, global = true)]
    pub mock: bool,

    /// Fall back to a local moderator session when the backend is down.
    #[arg(long, global = true)]
    pub dev_fallback: bool,

    /// Per-request timeout in seconds [default: 15]
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Print raw JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the backend answers.
    Ping,
    /// Log in as a moderator.
    Login {
        /// Account email.
        email: String,
        /// Password; read from stdin when omitted [env: MODCONSOLE_PASSWORD]
        #[arg(long)]
        password: Option<String>,
        /// Ask for a long-lived session.
        #[arg(long)]
        remember: bool,
    },
    /// End the session and forget local credentials.
    Logout,
    /// Show the current moderator.
    Whoami,
    /// List reported messages, one line per message.
    Reports {
        /// Only reports with this status.
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        status: StatusFilter,
    },
    /// Show a message with every report about it.
    Show(MessageArgs),
    /// Delete a message.
    Delete {
        #[command(flatten)]
        target: MessageArgs,
        /// Do not ask for confirmation.
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Mark every report about a message as reviewed.
    Clear(MessageArgs),
    /// Block the author of a message.
    Mute {
        #[command(flatten)]
        target: MessageArgs,
        /// Do not ask for confirmation.
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// List blocked users.
    Blocked,
    /// Lift a block.
    Unblock {
        /// Block id as shown by `blocked`.
        block_id: i64,
    },
    /// Show dashboard counters.
    Stats,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct MessageArgs {
    /// Message table.
    #[arg(value_enum)]
    pub kind: MessageKind,
    /// Message id.
    pub id: i64,
}

impl MessageArgs {
    pub fn key(&self) -> MessageKey {
        MessageKey::new(self.kind.into(), self.id)
    }

    pub fn kind_label(&self) -> &'static str {
        MessageType::from(self.kind).as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageKind {
    Public,
    Direct,
}

impl From<MessageKind> for MessageType {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Public => MessageType::Public,
            MessageKind::Direct => MessageType::Direct,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusFilter {
    All,
    Pending,
    Reviewed,
    Dismissed,
}

impl StatusFilter {
    pub fn status(self) -> Option<ReportStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some(ReportStatus::Pending),
            StatusFilter::Reviewed => Some(ReportStatus::Reviewed),
            StatusFilter::Dismissed => Some(ReportStatus::Dismissed),
        }
    }
}
