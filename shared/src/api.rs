//! The contract every data source of the console implements.
//!
//! [`crate::client::RemoteClient`] talks to the real backend;
//! [`crate::mock::MockModerationApi`] serves seeded in-memory data for local
//! development. Session and dashboard logic only ever see this trait, so
//! they behave identically on both.

use async_trait::async_trait;

use crate::{
    error::ApiError,
    models::{
        BlockedUser, DashboardStats, LoginRequest, Message, MessageKey, Report, ReportId,
        ReportStatus, UserId, UserIdentity,
    },
};

/// REST operations consumed by the moderation console.
#[async_trait(?Send)]
pub trait ModerationApi {
    /// `POST /auth/login`. Returns the identity attached to the new
    /// session; privilege checks are the caller's job.
    async fn login(&self, request: &LoginRequest) -> Result<UserIdentity, ApiError>;

    /// `POST /auth/logout`.
    async fn logout(&self) -> Result<(), ApiError>;

    /// `GET /auth/me`. `Ok(None)` when the backend answers that there is no
    /// session.
    async fn current_user(&self) -> Result<Option<UserIdentity>, ApiError>;

    /// `GET /admin/reports`, optionally filtered by status.
    async fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<Report>, ApiError>;

    /// `PATCH /admin/reports/{id}`.
    async fn update_report_status(
        &self,
        report_id: ReportId,
        status: ReportStatus,
    ) -> Result<(), ApiError>;

    /// `GET /admin/blocked-users`.
    async fn blocked_users(&self) -> Result<Vec<BlockedUser>, ApiError>;

    /// `POST /admin/block-user`.
    async fn block_user(&self, blocker_id: UserId, blocked_id: UserId) -> Result<(), ApiError>;

    /// `DELETE /admin/unblock-user/{id}`.
    async fn unblock_user(&self, block_id: i64) -> Result<(), ApiError>;

    /// `GET /admin/message/{type}/{id}`.
    async fn message_detail(&self, key: MessageKey) -> Result<Message, ApiError>;

    /// `DELETE /admin/message/{type}/{id}`.
    async fn delete_message(&self, key: MessageKey) -> Result<(), ApiError>;

    /// `GET /admin/dashboard-stats`.
    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError>;

    /// `GET /test-connection` liveness probe.
    async fn test_connection(&self) -> Result<serde_json::Value, ApiError>;
}
