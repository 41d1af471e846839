use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric id of a report row.
pub type ReportId = i64;
/// Numeric id of a user row.
pub type UserId = i64;
/// Numeric id of a message row. Only unique together with its
/// [`MessageType`].
pub type MessageId = i64;

/// The two message tables a report can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// Message posted to a public channel.
    Public,
    /// Private message between two users.
    Direct,
}

impl MessageType {
    /// Path segment used by the admin message endpoints.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Public => "public",
            MessageType::Direct => "direct",
        }
    }

    /// Human label used by list and detail views.
    pub fn label(self) -> &'static str {
        match self {
            MessageType::Public => "Public message",
            MessageType::Direct => "Direct message",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MessageType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(MessageType::Public),
            "direct" => Ok(MessageType::Direct),
            other => Err(format!("unknown message type `{other}` (expected public or direct)")),
        }
    }
}

/// Lifecycle of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Waiting for a moderator.
    Pending,
    /// A moderator looked at it.
    Reviewed,
    /// Closed without action.
    Dismissed,
}

impl ReportStatus {
    /// Every status, in filter-bar order.
    pub const ALL: [ReportStatus; 3] =
        [ReportStatus::Pending, ReportStatus::Reviewed, ReportStatus::Dismissed];

    /// Wire value, also used as the `status` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewed => "reviewed",
            ReportStatus::Dismissed => "dismissed",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ReportStatus::Pending),
            "reviewed" => Ok(ReportStatus::Reviewed),
            "dismissed" => Ok(ReportStatus::Dismissed),
            other => Err(format!(
                "unknown report status `{other}` (expected pending, reviewed or dismissed)"
            )),
        }
    }
}

/// Composite identity of a message. Neither half alone is unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageKey {
    /// Which table the id belongs to.
    pub message_type: MessageType,
    /// Row id inside that table.
    pub message_id: MessageId,
}

impl MessageKey {
    /// Build a key from its two halves.
    pub fn new(message_type: MessageType, message_id: MessageId) -> Self {
        Self {
            message_type,
            message_id,
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.message_type, self.message_id)
    }
}

/// Optional profile block attached to an identity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    /// Free-form display name.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// The account behind a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Account id.
    pub id: UserId,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Handle shown in the header.
    #[serde(default)]
    pub username: String,
    /// Moderator privilege flag. Required for any console access.
    #[serde(default)]
    pub is_moderator: bool,
    /// Profile data, if the backend sent any.
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

impl UserIdentity {
    /// Display name if set, otherwise the username, otherwise the email.
    pub fn display_name(&self) -> &str {
        self.profile
            .as_ref()
            .and_then(|profile| profile.display_name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .or_else(|| Some(self.username.as_str()).filter(|name| !name.is_empty()))
            .unwrap_or(self.email.as_str())
    }
}

/// Compact user reference embedded in reports and messages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserRef {
    /// Account id, when present.
    #[serde(default)]
    pub id: Option<UserId>,
    /// Handle.
    #[serde(default)]
    pub username: Option<String>,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl UserRef {
    /// Best available label for this user.
    pub fn label(&self) -> &str {
        self.username
            .as_deref()
            .or(self.display_name.as_deref())
            .unwrap_or("Unknown")
    }
}

/// Copy of the reported message embedded in a report row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageSnapshot {
    /// Message text.
    #[serde(default)]
    pub content: Option<String>,
    /// Author of the message (sender for direct messages).
    #[serde(default, alias = "user_id", alias = "sender_id")]
    pub author_id: Option<UserId>,
    /// When the message was posted.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A user complaint about one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Report id.
    pub id: ReportId,
    /// Who filed the report.
    #[serde(default)]
    pub reporter_id: Option<UserId>,
    /// Embedded reporter record.
    #[serde(default)]
    pub reporter: Option<UserRef>,
    /// Author of the reported message.
    #[serde(default)]
    pub reported_user_id: Option<UserId>,
    /// Embedded reported-user record.
    #[serde(default)]
    pub reported_user: Option<UserRef>,
    /// Target message id.
    pub message_id: MessageId,
    /// Target message table.
    pub message_type: MessageType,
    /// Free-text reason.
    #[serde(default)]
    pub reason: String,
    /// Current status.
    pub status: ReportStatus,
    /// Creation timestamp as sent by the backend.
    #[serde(default)]
    pub created_at: String,
    /// Snapshot of the target message, if the backend embedded one.
    #[serde(default)]
    pub message: Option<MessageSnapshot>,
}

impl Report {
    /// The grouping key of this report.
    pub fn message_key(&self) -> MessageKey {
        MessageKey::new(self.message_type, self.message_id)
    }
}

/// Who wrote a message. The shape depends on the message table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MessageAuthor {
    /// Public messages carry a single author.
    Public {
        /// Author id.
        user_id: Option<UserId>,
        /// Embedded author record.
        user: Option<UserRef>,
    },
    /// Direct messages carry both ends of the conversation.
    Direct {
        /// Sender id.
        sender_id: Option<UserId>,
        /// Recipient id.
        recipient_id: Option<UserId>,
        /// Embedded sender record.
        sender: Option<UserRef>,
        /// Embedded recipient record.
        recipient: Option<UserRef>,
    },
}

impl MessageAuthor {
    /// Id of the user who wrote the message.
    pub fn author_id(&self) -> Option<UserId> {
        match self {
            MessageAuthor::Public {
                user_id,
                user,
            } => user_id.or_else(|| user.as_ref().and_then(|u| u.id)),
            MessageAuthor::Direct {
                sender_id,
                sender,
                ..
            } => sender_id.or_else(|| sender.as_ref().and_then(|u| u.id)),
        }
    }

    /// Label of the user who wrote the message.
    pub fn author_label(&self) -> &str {
        let author = match self {
            MessageAuthor::Public {
                user, ..
            } => user.as_ref(),
            MessageAuthor::Direct {
                sender, ..
            } => sender.as_ref(),
        };
        author.map(UserRef::label).unwrap_or("Unknown User")
    }
}

/// Full message detail as returned by the admin message endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message id.
    pub id: MessageId,
    /// Table the message lives in.
    pub message_type: MessageType,
    /// Text, rendered verbatim.
    pub content: Option<String>,
    /// Posting time as sent by the backend.
    pub created_at: Option<String>,
    /// Author information.
    pub author: MessageAuthor,
}

impl Message {
    /// The composite identity of this message.
    pub fn key(&self) -> MessageKey {
        MessageKey::new(self.message_type, self.id)
    }

    /// Content or the placeholder the views show for empty messages.
    pub fn content_or_placeholder(&self) -> &str {
        self.content.as_deref().unwrap_or("No content available")
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PublicMessageWire {
    pub id: MessageId,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user: Option<UserRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectMessageWire {
    pub id: MessageId,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub sender_id: Option<UserId>,
    #[serde(default)]
    pub recipient_id: Option<UserId>,
    #[serde(default)]
    pub sender: Option<UserRef>,
    #[serde(default)]
    pub recipient: Option<UserRef>,
}

impl Message {
    /// Decode a message body whose layout depends on `message_type`.
    pub fn from_json(
        message_type: MessageType,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        match message_type {
            MessageType::Public => {
                let wire: PublicMessageWire = serde_json::from_value(value)?;
                Ok(Message {
                    id: wire.id,
                    message_type,
                    content: wire.content,
                    created_at: wire.created_at,
                    author: MessageAuthor::Public {
                        user_id: wire.user_id,
                        user: wire.user,
                    },
                })
            },
            MessageType::Direct => {
                let wire: DirectMessageWire = serde_json::from_value(value)?;
                Ok(Message {
                    id: wire.id,
                    message_type,
                    content: wire.content,
                    created_at: wire.created_at,
                    author: MessageAuthor::Direct {
                        sender_id: wire.sender_id,
                        recipient_id: wire.recipient_id,
                        sender: wire.sender,
                        recipient: wire.recipient,
                    },
                })
            },
        }
    }
}

/// Aggregate counters shown in the stats cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Reports still pending.
    #[serde(default)]
    pub pending_reports: u64,
    /// All reports.
    #[serde(default)]
    pub total_reports: u64,
    /// Active blocks.
    #[serde(default)]
    pub blocked_users: u64,
    /// Public message count.
    #[serde(default)]
    pub public_messages: u64,
    /// Direct message count.
    #[serde(default)]
    pub direct_messages: u64,
}

impl DashboardStats {
    /// Public plus direct messages.
    pub fn total_messages(&self) -> u64 {
        self.public_messages.saturating_add(self.direct_messages)
    }
}

/// One row of the blocked-users list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedUser {
    /// Block id, used by the unblock endpoint.
    pub id: i64,
    /// User who placed the block.
    #[serde(default)]
    pub blocker_id: Option<UserId>,
    /// User who is blocked.
    #[serde(default)]
    pub blocked_id: Option<UserId>,
    /// Embedded blocked-user record.
    #[serde(default)]
    pub blocked: Option<UserRef>,
    /// When the block was placed.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Ask the backend for a long-lived session cookie.
    pub remember: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn report_decodes_backend_row() {
        let report: Report = serde_json::from_value(json!({
            "id": 7,
            "reporter_id": 3,
            "reporter": { "id": 3, "username": "alice" },
            "reported_user": { "username": "mallory" },
            "message_id": 120,
            "message_type": "public",
            "reason": "spam",
            "status": "pending",
            "created_at": "2024-03-01T10:00:00Z",
            "message": { "content": "buy now", "user_id": 9 }
        }))
        .expect("report row");

        assert_eq!(report.message_key(), MessageKey::new(MessageType::Public, 120));
        assert_eq!(report.reporter.as_ref().map(UserRef::label), Some("alice"));
        assert_eq!(report.message.as_ref().and_then(|m| m.author_id), Some(9));
        assert_eq!(report.status, ReportStatus::Pending);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let row = json!({
            "id": 1, "message_id": 1, "message_type": "public", "status": "archived"
        });
        assert!(serde_json::from_value::<Report>(row).is_err());
    }

    #[test]
    fn direct_message_keeps_both_participants() {
        let message = Message::from_json(
            MessageType::Direct,
            json!({
                "id": 44,
                "content": "hey",
                "sender_id": 1,
                "recipient_id": 2,
                "sender": { "username": "bob" }
            }),
        )
        .expect("direct message");

        assert_eq!(message.key(), MessageKey::new(MessageType::Direct, 44));
        assert_eq!(message.author.author_id(), Some(1));
        assert_eq!(message.author.author_label(), "bob");
        match message.author {
            MessageAuthor::Direct {
                recipient_id, ..
            } => assert_eq!(recipient_id, Some(2)),
            MessageAuthor::Public {
                ..
            } => panic!("direct message decoded as public"),
        }
    }

    #[test]
    fn display_name_falls_back_to_username_then_email() {
        let mut user = UserIdentity {
            id: 1,
            email: "mod@example.com".to_string(),
            username: String::new(),
            is_moderator: true,
            profile: None,
        };
        assert_eq!(user.display_name(), "mod@example.com");
        user.username = "mod".to_string();
        assert_eq!(user.display_name(), "mod");
        user.profile = Some(UserProfile {
            display_name: Some("The Mod".to_string()),
        });
        assert_eq!(user.display_name(), "The Mod");
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("Direct".parse::<MessageType>(), Ok(MessageType::Direct));
        assert_eq!(" reviewed ".parse::<ReportStatus>(), Ok(ReportStatus::Reviewed));
        assert!("group".parse::<MessageType>().is_err());
    }
}
