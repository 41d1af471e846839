//! Dashboard orchestration: fetch on filter change, message selection and
//! moderation actions, with local reconciliation after confirmed calls.
//!
//! Every network-bound operation comes in two halves. `begin_*` hands out a
//! ticket stamped with a fresh sequence number; `finish_*` applies the
//! response only when that ticket is still the latest of its kind and the
//! controller has not been torn down. Responses of superseded calls are
//! dropped, so a slow early fetch can never overwrite a newer one. The async
//! helpers (`set_status_filter`, `select_message`, `perform_action`, ...)
//! simply chain both halves for callers that can hold `&mut self` across
//! the await.

use std::collections::HashSet;

use futures::future::join_all;

use crate::{
    aggregate::{group, representatives_for, ReportGroups},
    api::ModerationApi,
    error::{ActionError, ApiError},
    models::{DashboardStats, Message, MessageKey, Report, ReportId, ReportStatus, UserId},
    reconcile::{apply_delete, apply_reviewed},
};

/// Whether a finished call changed controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketOutcome {
    /// The response was current and has been applied.
    Applied,
    /// A newer call of the same kind was issued, or the controller was torn
    /// down; the response was ignored.
    Discarded,
}

/// Ticket for a report-list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    status: Option<ReportStatus>,
}

impl FetchTicket {
    /// Filter the fetch must use.
    pub fn status(&self) -> Option<ReportStatus> {
        self.status
    }
}

/// Ticket for a message-detail fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTicket {
    seq: u64,
    key: MessageKey,
}

impl SelectionTicket {
    /// Message to fetch.
    pub fn key(&self) -> MessageKey {
        self.key
    }
}

/// Ticket for a stats refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsTicket {
    seq: u64,
}

/// Message currently open in the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Full message as fetched.
    pub message: Message,
    /// Every held report about that message.
    pub reports: Vec<Report>,
}

/// A moderation action, with everything the remote calls need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationAction {
    /// Delete the message.
    Delete {
        /// Message to delete.
        key: MessageKey,
    },
    /// Mark every report of the group reviewed.
    ClearReports {
        /// Message the reports are about.
        key: MessageKey,
        /// Reports to update, one call each.
        report_ids: Vec<ReportId>,
    },
    /// Block the author of the message on behalf of the moderator.
    MuteAuthor {
        /// Moderator placing the block.
        moderator_id: UserId,
        /// Author being blocked.
        author_id: UserId,
    },
}

/// Raw results of the remote half of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionReceipt {
    /// Result of the delete call.
    Deleted(Result<(), ApiError>),
    /// One result per report update, in request order.
    Reviewed(Vec<(ReportId, Result<(), ApiError>)>),
    /// Result of the block call.
    Muted(Result<(), ApiError>),
}

/// What a completed action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The message is gone and its reports were dropped locally.
    Deleted {
        /// The deleted message.
        key: MessageKey,
        /// Number of held reports removed.
        removed: usize,
    },
    /// Some or all report updates succeeded.
    Reviewed {
        /// Reports the backend confirmed.
        reviewed: Vec<ReportId>,
        /// Reports whose update failed, with the error.
        failed: Vec<(ReportId, ApiError)>,
    },
    /// The author is blocked.
    Muted {
        /// The blocked user.
        author_id: UserId,
    },
}

impl ActionOutcome {
    /// A bulk update where only part of the calls succeeded.
    pub fn is_partial(&self) -> bool {
        matches!(self, ActionOutcome::Reviewed { failed, .. } if !failed.is_empty())
    }

    /// Confirmation text for the detail view.
    pub fn summary(&self) -> String {
        match self {
            ActionOutcome::Deleted {
                ..
            } => "Message deleted successfully".to_string(),
            ActionOutcome::Reviewed {
                reviewed,
                failed,
            } if failed.is_empty() => format!("{} report(s) marked as reviewed", reviewed.len()),
            ActionOutcome::Reviewed {
                reviewed,
                failed,
            } => format!(
                "{} report(s) marked as reviewed, {} failed",
                reviewed.len(),
                failed.len()
            ),
            ActionOutcome::Muted {
                author_id,
            } => format!("User {author_id} muted"),
        }
    }
}

/// Run the remote half of `action`. Bulk updates are issued concurrently
/// and every outcome is awaited before returning.
pub async fn execute_action<A>(api: &A, action: &ModerationAction) -> ActionReceipt
where
    A: ModerationApi + ?Sized,
{
    match action {
        ModerationAction::Delete {
            key,
        } => ActionReceipt::Deleted(api.delete_message(*key).await),
        ModerationAction::ClearReports {
            report_ids, ..
        } => {
            let calls = report_ids.iter().map(|&report_id| async move {
                let result = api
                    .update_report_status(report_id, ReportStatus::Reviewed)
                    .await;
                (report_id, result)
            });
            ActionReceipt::Reviewed(join_all(calls).await)
        },
        ModerationAction::MuteAuthor {
            moderator_id,
            author_id,
        } => ActionReceipt::Muted(api.block_user(*moderator_id, *author_id).await),
    }
}

/// Owner of the working report set.
#[derive(Debug, Default)]
pub struct DashboardController {
    status_filter: Option<ReportStatus>,
    reports: Vec<Report>,
    groups: ReportGroups,
    selection: Option<Selection>,
    stats: Option<DashboardStats>,
    loading: bool,
    error: Option<String>,
    notice: Option<String>,
    fetch_seq: u64,
    selection_seq: u64,
    stats_seq: u64,
    torn_down: bool,
}

impl DashboardController {
    /// Empty controller, no filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Active status filter.
    pub fn status_filter(&self) -> Option<ReportStatus> {
        self.status_filter
    }

    /// Held reports in fetch order.
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Held reports grouped by message.
    pub fn groups(&self) -> &ReportGroups {
        &self.groups
    }

    /// One report per message, for the list view.
    pub fn representatives(&self) -> Vec<Report> {
        representatives_for(&self.groups)
    }

    /// Open message, if any.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Last fetched stats.
    pub fn stats(&self) -> Option<&DashboardStats> {
        self.stats.as_ref()
    }

    /// A report fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Inline error from the last failed operation.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Confirmation from the last successful action.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Dismiss the inline error.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Dismiss the confirmation.
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Held reports per status, for the filter bar badges.
    pub fn status_counts(&self) -> [(ReportStatus, usize); 3] {
        ReportStatus::ALL.map(|status| {
            let count = self
                .reports
                .iter()
                .filter(|report| report.status == status)
                .count();
            (status, count)
        })
    }

    /// Start a fetch with `status` as the new filter. Any earlier fetch
    /// still in flight becomes stale.
    pub fn begin_fetch(&mut self, status: Option<ReportStatus>) -> FetchTicket {
        self.fetch_seq += 1;
        self.status_filter = status;
        self.loading = true;
        self.reset_messages();
        FetchTicket {
            seq: self.fetch_seq,
            status,
        }
    }

    /// Start a fetch with the current filter.
    pub fn begin_refresh(&mut self) -> FetchTicket {
        self.begin_fetch(self.status_filter)
    }

    /// Apply a fetch result. A current success replaces the held set
    /// entirely; a current failure keeps it and records the error.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Report>, ApiError>,
    ) -> Result<TicketOutcome, ApiError> {
        if !self.is_current(ticket.seq, self.fetch_seq) {
            tracing::debug!(seq = ticket.seq, latest = self.fetch_seq, "dropping stale report fetch");
            return Ok(TicketOutcome::Discarded);
        }
        self.loading = false;
        match result {
            Ok(reports) => {
                tracing::debug!(count = reports.len(), filter = ?ticket.status, "reports loaded");
                self.replace_reports(reports);
                Ok(TicketOutcome::Applied)
            },
            Err(err) => {
                tracing::warn!("error loading reports: {err}");
                self.error = Some(format!("Failed to load reports: {}", err.user_message()));
                Err(err)
            },
        }
    }

    /// Change the filter and fetch. The held set is replaced, never merged.
    pub async fn set_status_filter<A>(
        &mut self,
        api: &A,
        status: Option<ReportStatus>,
    ) -> Result<TicketOutcome, ApiError>
    where
        A: ModerationApi + ?Sized,
    {
        let ticket = self.begin_fetch(status);
        let result = api.list_reports(ticket.status()).await;
        self.finish_fetch(ticket, result)
    }

    /// Re-fetch with the current filter.
    pub async fn refresh<A>(&mut self, api: &A) -> Result<TicketOutcome, ApiError>
    where
        A: ModerationApi + ?Sized,
    {
        self.set_status_filter(api, self.status_filter).await
    }

    /// Start loading the detail of the message `report` points at.
    pub fn begin_selection(&mut self, report: &Report) -> SelectionTicket {
        self.selection_seq += 1;
        self.reset_messages();
        SelectionTicket {
            seq: self.selection_seq,
            key: report.message_key(),
        }
    }

    /// Apply a message-detail result. Failures leave the list and any
    /// previous selection untouched.
    pub fn finish_selection(
        &mut self,
        ticket: SelectionTicket,
        result: Result<Message, ApiError>,
    ) -> Result<TicketOutcome, ApiError> {
        if !self.is_current(ticket.seq, self.selection_seq) {
            return Ok(TicketOutcome::Discarded);
        }
        match result {
            Ok(message) => {
                let reports = self.groups.reports_for(&ticket.key).to_vec();
                self.selection = Some(Selection {
                    message,
                    reports,
                });
                Ok(TicketOutcome::Applied)
            },
            Err(err) => {
                tracing::warn!(key = %ticket.key, "error getting message details: {err}");
                self.error =
                    Some(format!("Failed to load message details: {}", err.user_message()));
                Err(err)
            },
        }
    }

    /// Fetch and open the message `report` points at.
    pub async fn select_message<A>(
        &mut self,
        api: &A,
        report: &Report,
    ) -> Result<TicketOutcome, ApiError>
    where
        A: ModerationApi + ?Sized,
    {
        let ticket = self.begin_selection(report);
        let result = api.message_detail(ticket.key()).await;
        self.finish_selection(ticket, result)
    }

    /// Close the detail view; an in-flight detail fetch is dropped.
    pub fn dismiss_selection(&mut self) {
        self.selection_seq += 1;
        self.selection = None;
    }

    /// Delete action for the open message.
    pub fn delete_action(&self) -> Result<ModerationAction, ActionError> {
        let selection = self.require_selection()?;
        Ok(ModerationAction::Delete {
            key: selection.message.key(),
        })
    }

    /// Mark-reviewed action covering every held report of the open message.
    pub fn clear_reports_action(&self) -> Result<ModerationAction, ActionError> {
        let selection = self.require_selection()?;
        if selection.reports.is_empty() {
            return Err(ActionError::Unavailable("No reports to clear".to_string()));
        }
        Ok(ModerationAction::ClearReports {
            key: selection.message.key(),
            report_ids: selection.reports.iter().map(|report| report.id).collect(),
        })
    }

    /// Block action against the author of the open message.
    pub fn mute_author_action(
        &self,
        moderator_id: UserId,
    ) -> Result<ModerationAction, ActionError> {
        let selection = self.require_selection()?;
        let author_id = selection
            .message
            .author
            .author_id()
            .ok_or_else(|| ActionError::Unavailable("Message author is unknown".to_string()))?;
        Ok(ModerationAction::MuteAuthor {
            moderator_id,
            author_id,
        })
    }

    /// Clear the inline error and notice before an action is sent.
    pub fn begin_action(&mut self) {
        self.reset_messages();
    }

    /// Reconcile the held set with the confirmed part of an action.
    /// Nothing changes for calls that failed; the failure becomes the
    /// inline error.
    pub fn complete_action(
        &mut self,
        action: &ModerationAction,
        receipt: ActionReceipt,
    ) -> Result<ActionOutcome, ActionError> {
        let result = self.reconcile(action, receipt);
        match &result {
            Ok(outcome) if !self.torn_down => {
                if outcome.is_partial() {
                    self.error = Some(outcome.summary());
                } else {
                    self.notice = Some(outcome.summary());
                }
            },
            Ok(_) => {},
            Err(err) => {
                tracing::warn!("moderation action failed: {err}");
                self.record_action_error(err);
            },
        }
        result
    }

    fn reconcile(
        &mut self,
        action: &ModerationAction,
        receipt: ActionReceipt,
    ) -> Result<ActionOutcome, ActionError> {
        let outcome = match (action, receipt) {
            (
                ModerationAction::Delete {
                    key,
                },
                ActionReceipt::Deleted(result),
            ) => {
                result?;
                let before = self.reports.len();
                let remaining = apply_delete(key.message_id, key.message_type, &self.reports);
                let removed = before - remaining.len();
                if !self.torn_down {
                    self.replace_reports(remaining);
                    self.selection = None;
                    self.selection_seq += 1;
                }
                ActionOutcome::Deleted {
                    key: *key,
                    removed,
                }
            },
            (ModerationAction::ClearReports { .. }, ActionReceipt::Reviewed(results)) => {
                let mut reviewed = Vec::new();
                let mut failed = Vec::new();
                for (report_id, result) in results {
                    match result {
                        Ok(()) => reviewed.push(report_id),
                        Err(err) => failed.push((report_id, err)),
                    }
                }
                if reviewed.is_empty() {
                    return Err(ActionError::BulkFailed {
                        failures: failed,
                    });
                }
                if !failed.is_empty() {
                    tracing::warn!(
                        reviewed = reviewed.len(),
                        failed = failed.len(),
                        "bulk review partially failed"
                    );
                }
                if !self.torn_down {
                    let confirmed: HashSet<ReportId> = reviewed.iter().copied().collect();
                    let updated = apply_reviewed(&confirmed, &self.reports);
                    self.replace_reports(updated);
                }
                ActionOutcome::Reviewed {
                    reviewed,
                    failed,
                }
            },
            (
                ModerationAction::MuteAuthor {
                    author_id, ..
                },
                ActionReceipt::Muted(result),
            ) => {
                result?;
                ActionOutcome::Muted {
                    author_id: *author_id,
                }
            },
            _ => {
                return Err(ActionError::Unavailable(
                    "action result does not match the action".to_string(),
                ))
            },
        };
        Ok(outcome)
    }

    /// Run `action` against the backend, reconcile on success, then refresh
    /// the stats. A stats failure does not affect the outcome.
    pub async fn perform_action<A>(
        &mut self,
        api: &A,
        action: &ModerationAction,
    ) -> Result<ActionOutcome, ActionError>
    where
        A: ModerationApi + ?Sized,
    {
        self.begin_action();
        let receipt = execute_action(api, action).await;
        let outcome = self.complete_action(action, receipt)?;
        self.refresh_stats(api).await;
        Ok(outcome)
    }

    /// Start a stats refresh.
    pub fn begin_stats(&mut self) -> StatsTicket {
        self.stats_seq += 1;
        StatsTicket {
            seq: self.stats_seq,
        }
    }

    /// Apply a stats result. Failures are logged and change nothing.
    pub fn finish_stats(
        &mut self,
        ticket: StatsTicket,
        result: Result<DashboardStats, ApiError>,
    ) -> TicketOutcome {
        if !self.is_current(ticket.seq, self.stats_seq) {
            return TicketOutcome::Discarded;
        }
        match result {
            Ok(stats) => {
                self.stats = Some(stats);
                TicketOutcome::Applied
            },
            Err(err) => {
                tracing::warn!("error loading stats: {err}");
                TicketOutcome::Discarded
            },
        }
    }

    /// Fetch the stats cards.
    pub async fn refresh_stats<A>(&mut self, api: &A) -> TicketOutcome
    where
        A: ModerationApi + ?Sized,
    {
        let ticket = self.begin_stats();
        let result = api.dashboard_stats().await;
        self.finish_stats(ticket, result)
    }

    /// The consuming view is gone: every outstanding ticket becomes stale
    /// and later completions are ignored.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.fetch_seq += 1;
        self.selection_seq += 1;
        self.stats_seq += 1;
        self.loading = false;
    }

    /// Whether [`Self::teardown`] ran.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn is_current(&self, seq: u64, latest: u64) -> bool {
        !self.torn_down && seq == latest
    }

    fn replace_reports(&mut self, reports: Vec<Report>) {
        self.groups = group(&reports);
        self.reports = reports;
        if let Some(selection) = self.selection.as_mut() {
            selection.reports = self.groups.reports_for(&selection.message.key()).to_vec();
        }
    }

    fn require_selection(&self) -> Result<&Selection, ActionError> {
        self.selection
            .as_ref()
            .ok_or_else(|| ActionError::Unavailable("No message selected".to_string()))
    }

    /// Show `err` as the inline error, e.g. when an action could not even
    /// be built.
    pub fn record_action_error(&mut self, err: &ActionError) {
        if !self.torn_down {
            self.error = Some(err.user_message());
        }
    }

    fn reset_messages(&mut self) {
        self.error = None;
        self.notice = None;
    }
}
