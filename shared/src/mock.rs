//! In-memory data source for running the console without a backend.
//!
//! Selected at configuration time (`--mock` in the CLI, the `mock` feature
//! in the frontend). It keeps its own state, so deletes and status updates
//! stick for the lifetime of the process.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use serde_json::json;

use crate::{
    api::ModerationApi,
    error::ApiError,
    models::{
        BlockedUser, DashboardStats, LoginRequest, Message, MessageAuthor, MessageKey,
        MessageSnapshot, MessageType, Report, ReportId, ReportStatus, UserId, UserIdentity,
        UserProfile, UserRef,
    },
};

/// Email of the seeded moderator account.
pub const MOCK_MODERATOR_EMAIL: &str = "admin@example.com";
/// Email of a seeded account without moderator rights.
pub const MOCK_MEMBER_EMAIL: &str = "member@example.com";

#[derive(Debug, Clone)]
struct MockUser {
    id: UserId,
    username: &'static str,
    display_name: &'static str,
}

const USERS: [MockUser; 5] = [
    MockUser {
        id: 1,
        username: "admin",
        display_name: "Admin User",
    },
    MockUser {
        id: 2,
        username: "alice",
        display_name: "Alice",
    },
    MockUser {
        id: 3,
        username: "bob",
        display_name: "Bob",
    },
    MockUser {
        id: 4,
        username: "mallory",
        display_name: "Mallory",
    },
    MockUser {
        id: 5,
        username: "trent",
        display_name: "Trent",
    },
];

fn user_ref(id: UserId) -> Option<UserRef> {
    USERS.iter().find(|user| user.id == id).map(|user| UserRef {
        id: Some(user.id),
        username: Some(user.username.to_string()),
        display_name: Some(user.display_name.to_string()),
    })
}

#[derive(Debug, Default)]
struct MockState {
    messages: Vec<Message>,
    reports: Vec<Report>,
    blocks: Vec<BlockedUser>,
    session: Option<UserIdentity>,
}

/// Seeded in-memory implementation of [`ModerationApi`].
#[derive(Debug)]
pub struct MockModerationApi {
    state: RefCell<MockState>,
    next_block_id: Cell<i64>,
}

impl Default for MockModerationApi {
    fn default() -> Self {
        Self::seeded()
    }
}

impl MockModerationApi {
    /// Source with a handful of public and direct messages, some of them
    /// reported more than once.
    pub fn seeded() -> Self {
        let messages = vec![
            public(120, 4, "Buy cheap followers now!!! Visit my profile for the link."),
            public(121, 5, "Does anyone know when the next meetup is?"),
            public(122, 4, "You are all idiots and this forum is garbage."),
            direct(7, 4, 2, "Send me your password or I will report your account."),
            direct(8, 3, 2, "See you tomorrow at the station."),
        ];
        let reports = vec![
            report(1, 2, 4, 120, MessageType::Public, "spam", ReportStatus::Pending, "2024-03-09T08:15:00Z"),
            report(2, 2, 4, 7, MessageType::Direct, "harassment", ReportStatus::Pending, "2024-03-09T09:40:00Z"),
            report(3, 3, 4, 120, MessageType::Public, "spam", ReportStatus::Pending, "2024-03-09T10:05:00Z"),
            report(4, 5, 4, 122, MessageType::Public, "abusive language", ReportStatus::Pending, "2024-03-09T12:30:00Z"),
            report(5, 2, 5, 121, MessageType::Public, "off-topic", ReportStatus::Dismissed, "2024-03-08T17:00:00Z"),
            report(6, 3, 4, 122, MessageType::Public, "insults", ReportStatus::Reviewed, "2024-03-08T18:20:00Z"),
        ];
        let reports = reports
            .into_iter()
            .map(|mut report| {
                report.message = messages
                    .iter()
                    .find(|message| message.key() == report.message_key())
                    .map(snapshot);
                report
            })
            .collect();
        Self {
            state: RefCell::new(MockState {
                messages,
                reports,
                blocks: Vec::new(),
                session: None,
            }),
            next_block_id: Cell::new(1),
        }
    }

    /// Source with no data at all.
    pub fn empty() -> Self {
        Self {
            state: RefCell::new(MockState::default()),
            next_block_id: Cell::new(1),
        }
    }

    /// Start with `identity` already signed in, as if a previous process
    /// had logged in against the same source.
    pub fn with_session(self, identity: UserIdentity) -> Self {
        self.state.borrow_mut().session = Some(identity);
        self
    }

    /// Identity returned for the seeded moderator account.
    pub fn moderator_identity() -> UserIdentity {
        identity(1, MOCK_MODERATOR_EMAIL, true)
    }
}

fn identity(id: UserId, email: &str, is_moderator: bool) -> UserIdentity {
    let user = user_ref(id).unwrap_or_default();
    UserIdentity {
        id,
        email: email.to_string(),
        username: user.username.unwrap_or_default(),
        is_moderator,
        profile: Some(UserProfile {
            display_name: user.display_name,
        }),
    }
}

fn public(id: i64, author: UserId, content: &str) -> Message {
    Message {
        id,
        message_type: MessageType::Public,
        content: Some(content.to_string()),
        created_at: Some("2024-03-09T07:00:00Z".to_string()),
        author: MessageAuthor::Public {
            user_id: Some(author),
            user: user_ref(author),
        },
    }
}

fn direct(id: i64, sender: UserId, recipient: UserId, content: &str) -> Message {
    Message {
        id,
        message_type: MessageType::Direct,
        content: Some(content.to_string()),
        created_at: Some("2024-03-09T07:30:00Z".to_string()),
        author: MessageAuthor::Direct {
            sender_id: Some(sender),
            recipient_id: Some(recipient),
            sender: user_ref(sender),
            recipient: user_ref(recipient),
        },
    }
}

fn snapshot(message: &Message) -> MessageSnapshot {
    MessageSnapshot {
        content: message.content.clone(),
        author_id: message.author.author_id(),
        created_at: message.created_at.clone(),
    }
}

#[allow(clippy::too_many_arguments, reason = "seed rows are listed positionally")]
fn report(
    id: ReportId,
    reporter: UserId,
    reported: UserId,
    message_id: i64,
    message_type: MessageType,
    reason: &str,
    status: ReportStatus,
    created_at: &str,
) -> Report {
    Report {
        id,
        reporter_id: Some(reporter),
        reporter: user_ref(reporter),
        reported_user_id: Some(reported),
        reported_user: user_ref(reported),
        message_id,
        message_type,
        reason: reason.to_string(),
        status,
        created_at: created_at.to_string(),
        message: None,
    }
}

#[async_trait(?Send)]
impl ModerationApi for MockModerationApi {
    async fn login(&self, request: &LoginRequest) -> Result<UserIdentity, ApiError> {
        let identity = match request.email.as_str() {
            MOCK_MODERATOR_EMAIL => Self::moderator_identity(),
            MOCK_MEMBER_EMAIL => identity(2, MOCK_MEMBER_EMAIL, false),
            _ => {
                return Err(ApiError::Http {
                    status: 401,
                    message: Some("Invalid email or password".to_string()),
                })
            },
        };
        tracing::debug!(email = %request.email, "mock login");
        self.state.borrow_mut().session = Some(identity.clone());
        Ok(identity)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.state.borrow_mut().session = None;
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<UserIdentity>, ApiError> {
        Ok(self.state.borrow().session.clone())
    }

    async fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<Report>, ApiError> {
        let state = self.state.borrow();
        let mut reports: Vec<Report> = state
            .reports
            .iter()
            .filter(|report| status.is_none_or(|status| report.status == status))
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }

    async fn update_report_status(
        &self,
        report_id: ReportId,
        status: ReportStatus,
    ) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        let report = state
            .reports
            .iter_mut()
            .find(|report| report.id == report_id)
            .ok_or_else(|| ApiError::NotFound(format!("Report {report_id}")))?;
        report.status = status;
        Ok(())
    }

    async fn blocked_users(&self) -> Result<Vec<BlockedUser>, ApiError> {
        Ok(self.state.borrow().blocks.clone())
    }

    async fn block_user(&self, blocker_id: UserId, blocked_id: UserId) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        if state
            .blocks
            .iter()
            .any(|block| block.blocker_id == Some(blocker_id) && block.blocked_id == Some(blocked_id))
        {
            return Err(ApiError::Http {
                status: 409,
                message: Some("User is already blocked".to_string()),
            });
        }
        let id = self.next_block_id.get();
        self.next_block_id.set(id + 1);
        state.blocks.push(BlockedUser {
            id,
            blocker_id: Some(blocker_id),
            blocked_id: Some(blocked_id),
            blocked: user_ref(blocked_id),
            created_at: Some("2024-03-10T12:00:00Z".to_string()),
        });
        Ok(())
    }

    async fn unblock_user(&self, block_id: i64) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        let before = state.blocks.len();
        state.blocks.retain(|block| block.id != block_id);
        if state.blocks.len() == before {
            return Err(ApiError::NotFound(format!("Block {block_id}")));
        }
        Ok(())
    }

    async fn message_detail(&self, key: MessageKey) -> Result<Message, ApiError> {
        self.state
            .borrow()
            .messages
            .iter()
            .find(|message| message.key() == key)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Message {key}")))
    }

    async fn delete_message(&self, key: MessageKey) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        let before = state.messages.len();
        state.messages.retain(|message| message.key() != key);
        if state.messages.len() == before {
            return Err(ApiError::NotFound(format!("Message {key}")));
        }
        state.reports.retain(|report| report.message_key() != key);
        Ok(())
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let state = self.state.borrow();
        let count_messages = |kind: MessageType| {
            state
                .messages
                .iter()
                .filter(|message| message.message_type == kind)
                .count() as u64
        };
        Ok(DashboardStats {
            pending_reports: state
                .reports
                .iter()
                .filter(|report| report.status == ReportStatus::Pending)
                .count() as u64,
            total_reports: state.reports.len() as u64,
            blocked_users: state.blocks.len() as u64,
            public_messages: count_messages(MessageType::Public),
            direct_messages: count_messages(MessageType::Direct),
        })
    }

    async fn test_connection(&self) -> Result<serde_json::Value, ApiError> {
        Ok(json!({ "status": "ok", "source": "mock" }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_request(email: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: "secret".to_string(),
            remember: false,
        }
    }

    #[tokio::test]
    async fn seeded_reports_embed_their_message() {
        let api = MockModerationApi::seeded();
        let reports = api.list_reports(None).await.expect("list");

        assert_eq!(reports.len(), 6);
        assert!(reports.iter().all(|report| report.message.is_some()));
        assert!(reports.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn status_filter_and_updates() {
        let api = MockModerationApi::seeded();
        let pending = api.list_reports(Some(ReportStatus::Pending)).await.expect("list");
        assert_eq!(pending.len(), 4);

        api.update_report_status(1, ReportStatus::Reviewed)
            .await
            .expect("update");
        let pending = api.list_reports(Some(ReportStatus::Pending)).await.expect("list");
        assert_eq!(pending.len(), 3);
        assert!(matches!(
            api.update_report_status(99, ReportStatus::Reviewed).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_drops_message_and_its_reports() {
        let api = MockModerationApi::seeded();
        let key = MessageKey::new(MessageType::Public, 120);
        api.delete_message(key).await.expect("delete");

        let reports = api.list_reports(None).await.expect("list");
        assert!(reports.iter().all(|report| report.message_key() != key));
        assert!(matches!(api.message_detail(key).await, Err(ApiError::NotFound(_))));
        assert_eq!(api.dashboard_stats().await.expect("stats").public_messages, 2);
    }

    #[tokio::test]
    async fn login_knows_two_accounts() {
        let api = MockModerationApi::seeded();
        assert!(api.current_user().await.expect("me").is_none());

        let member = api.login(&login_request(MOCK_MEMBER_EMAIL)).await.expect("login");
        assert!(!member.is_moderator);

        let admin = api.login(&login_request(MOCK_MODERATOR_EMAIL)).await.expect("login");
        assert!(admin.is_moderator);
        assert_eq!(api.current_user().await.expect("me"), Some(admin));

        let err = api.login(&login_request("nobody@example.com")).await.unwrap_err();
        assert!(err.is_auth_rejected());
    }

    #[tokio::test]
    async fn blocks_round_trip() {
        let api = MockModerationApi::empty();
        api.block_user(1, 4).await.expect("block");
        assert!(api.block_user(1, 4).await.is_err());

        let blocks = api.blocked_users().await.expect("blocks");
        assert_eq!(blocks.len(), 1);
        api.unblock_user(blocks[0].id).await.expect("unblock");
        assert!(api.blocked_users().await.expect("blocks").is_empty());
    }
}
