//! Scripted doubles for the integration tests.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::{
    cell::{Cell, RefCell},
    collections::{HashSet, VecDeque},
};

use async_trait::async_trait;
use modconsole_shared::{
    client::{ApiRequest, ApiResponse, Transport},
    models::{
        BlockedUser, DashboardStats, LoginRequest, Message, MessageAuthor, MessageKey,
        MessageType, Report, ReportId, ReportStatus, UserId, UserIdentity,
    },
    ApiError, ModerationApi,
};

pub fn moderator() -> UserIdentity {
    UserIdentity {
        id: 1,
        email: "admin@example.com".to_string(),
        username: "admin".to_string(),
        is_moderator: true,
        profile: None,
    }
}

pub fn member() -> UserIdentity {
    UserIdentity {
        id: 2,
        email: "member@example.com".to_string(),
        username: "member".to_string(),
        is_moderator: false,
        profile: None,
    }
}

pub fn report(id: ReportId, message_type: MessageType, message_id: i64) -> Report {
    Report {
        id,
        reporter_id: Some(10 + id),
        reporter: None,
        reported_user_id: Some(4),
        reported_user: None,
        message_id,
        message_type,
        reason: "spam".to_string(),
        status: ReportStatus::Pending,
        created_at: "2024-03-09T08:00:00Z".to_string(),
        message: None,
    }
}

pub fn message(message_type: MessageType, id: i64, author: UserId) -> Message {
    let author = match message_type {
        MessageType::Public => MessageAuthor::Public {
            user_id: Some(author),
            user: None,
        },
        MessageType::Direct => MessageAuthor::Direct {
            sender_id: Some(author),
            recipient_id: Some(99),
            sender: None,
            recipient: None,
        },
    };
    Message {
        id,
        message_type,
        content: Some(format!("message {id}")),
        created_at: Some("2024-03-09T07:00:00Z".to_string()),
        author,
    }
}

pub fn server_error() -> ApiError {
    ApiError::Http {
        status: 500,
        message: Some("boom".to_string()),
    }
}

pub fn unreachable() -> ApiError {
    ApiError::NetworkUnreachable("connection refused".to_string())
}

/// [`ModerationApi`] whose answers are set up front. Every call is
/// recorded by name.
pub struct FakeApi {
    pub login_result: RefCell<Result<UserIdentity, ApiError>>,
    pub logout_result: RefCell<Result<(), ApiError>>,
    pub current_user_result: RefCell<Result<Option<UserIdentity>, ApiError>>,
    pub reports: RefCell<Result<Vec<Report>, ApiError>>,
    pub messages: RefCell<Vec<Message>>,
    pub delete_result: RefCell<Result<(), ApiError>>,
    pub failing_updates: RefCell<HashSet<ReportId>>,
    pub block_result: RefCell<Result<(), ApiError>>,
    pub stats_result: RefCell<Result<DashboardStats, ApiError>>,
    pub calls: RefCell<Vec<String>>,
    pub last_login: RefCell<Option<LoginRequest>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            login_result: RefCell::new(Ok(moderator())),
            logout_result: RefCell::new(Ok(())),
            current_user_result: RefCell::new(Ok(Some(moderator()))),
            reports: RefCell::new(Ok(Vec::new())),
            messages: RefCell::new(Vec::new()),
            delete_result: RefCell::new(Ok(())),
            failing_updates: RefCell::new(HashSet::new()),
            block_result: RefCell::new(Ok(())),
            stats_result: RefCell::new(Ok(DashboardStats::default())),
            calls: RefCell::new(Vec::new()),
            last_login: RefCell::new(None),
        }
    }
}

impl FakeApi {
    pub fn with_reports(reports: Vec<Report>) -> Self {
        let api = Self::default();
        *api.reports.borrow_mut() = Ok(reports);
        api
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.starts_with(name))
            .count()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }
}

#[async_trait(?Send)]
impl ModerationApi for FakeApi {
    async fn login(&self, request: &LoginRequest) -> Result<UserIdentity, ApiError> {
        self.record("login");
        *self.last_login.borrow_mut() = Some(request.clone());
        self.login_result.borrow().clone()
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.record("logout");
        self.logout_result.borrow().clone()
    }

    async fn current_user(&self) -> Result<Option<UserIdentity>, ApiError> {
        self.record("current_user");
        self.current_user_result.borrow().clone()
    }

    async fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<Report>, ApiError> {
        self.record(format!("list_reports:{}", status.map_or("all", ReportStatus::as_str)));
        self.reports.borrow().clone().map(|reports| {
            reports
                .into_iter()
                .filter(|report| status.is_none_or(|status| report.status == status))
                .collect()
        })
    }

    async fn update_report_status(
        &self,
        report_id: ReportId,
        status: ReportStatus,
    ) -> Result<(), ApiError> {
        self.record(format!("update_report_status:{report_id}:{status}"));
        if self.failing_updates.borrow().contains(&report_id) {
            return Err(server_error());
        }
        Ok(())
    }

    async fn blocked_users(&self) -> Result<Vec<BlockedUser>, ApiError> {
        self.record("blocked_users");
        Ok(Vec::new())
    }

    async fn block_user(&self, blocker_id: UserId, blocked_id: UserId) -> Result<(), ApiError> {
        self.record(format!("block_user:{blocker_id}:{blocked_id}"));
        self.block_result.borrow().clone()
    }

    async fn unblock_user(&self, block_id: i64) -> Result<(), ApiError> {
        self.record(format!("unblock_user:{block_id}"));
        Ok(())
    }

    async fn message_detail(&self, key: MessageKey) -> Result<Message, ApiError> {
        self.record(format!("message_detail:{key}"));
        self.messages
            .borrow()
            .iter()
            .find(|message| message.key() == key)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Message {key}")))
    }

    async fn delete_message(&self, key: MessageKey) -> Result<(), ApiError> {
        self.record(format!("delete_message:{key}"));
        self.delete_result.borrow().clone()
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.record("dashboard_stats");
        self.stats_result.borrow().clone()
    }

    async fn test_connection(&self) -> Result<serde_json::Value, ApiError> {
        self.record("test_connection");
        Ok(serde_json::json!({ "status": "ok" }))
    }
}

/// [`Transport`] that replays queued responses and keeps every request.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<ApiResponse, ApiError>>>,
    requests: RefCell<Vec<ApiRequest>>,
    sent: Cell<usize>,
}

impl ScriptedTransport {
    pub fn push_json(&self, status: u16, body: serde_json::Value) -> &Self {
        self.responses.borrow_mut().push_back(Ok(ApiResponse {
            status,
            content_type: Some("application/json".to_string()),
            body: body.to_string(),
        }));
        self
    }

    pub fn push_text(&self, status: u16, body: &str) -> &Self {
        self.responses.borrow_mut().push_back(Ok(ApiResponse {
            status,
            content_type: Some("text/plain".to_string()),
            body: body.to_string(),
        }));
        self
    }

    pub fn push_error(&self, err: ApiError) -> &Self {
        self.responses.borrow_mut().push_back(Err(err));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.borrow().last().cloned()
    }

    pub fn sent(&self) -> usize {
        self.sent.get()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.sent.set(self.sent.get() + 1);
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::NetworkUnreachable("no scripted response".to_string())))
    }
}
