//! Local follow-up of confirmed moderation actions.
//!
//! Both functions return a fresh list and leave their input alone; callers
//! only run them after the backend confirmed the matching call.

use std::collections::HashSet;

use crate::models::{MessageId, MessageType, Report, ReportId, ReportStatus};

/// Drop every report about the deleted message, keeping the rest in order.
pub fn apply_delete(
    message_id: MessageId,
    message_type: MessageType,
    reports: &[Report],
) -> Vec<Report> {
    reports
        .iter()
        .filter(|report| !(report.message_id == message_id && report.message_type == message_type))
        .cloned()
        .collect()
}

/// Mark the listed reports reviewed; every other report is returned as is.
pub fn apply_reviewed(report_ids: &HashSet<ReportId>, reports: &[Report]) -> Vec<Report> {
    reports
        .iter()
        .map(|report| {
            if report_ids.contains(&report.id) {
                Report {
                    status: ReportStatus::Reviewed,
                    ..report.clone()
                }
            } else {
                report.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: i64, message_type: MessageType, message_id: i64) -> Report {
        Report {
            id,
            reporter_id: Some(100 + id),
            reporter: None,
            reported_user_id: None,
            reported_user: None,
            message_id,
            message_type,
            reason: "spam".to_string(),
            status: ReportStatus::Pending,
            created_at: "2024-03-01T10:00:00Z".to_string(),
            message: None,
        }
    }

    #[test]
    fn delete_removes_only_the_matching_message() {
        let reports = vec![
            report(1, MessageType::Public, 120),
            report(2, MessageType::Public, 121),
            report(3, MessageType::Public, 120),
        ];
        let left = apply_delete(120, MessageType::Public, &reports);

        assert_eq!(left, vec![reports[1].clone()]);
        assert_eq!(reports.len(), 3, "input must not change");
    }

    #[test]
    fn delete_respects_message_type() {
        let reports = vec![report(1, MessageType::Public, 9), report(2, MessageType::Direct, 9)];
        let left = apply_delete(9, MessageType::Direct, &reports);

        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, 1);
    }

    #[test]
    fn reviewed_touches_only_listed_ids() {
        let reports = vec![
            report(1, MessageType::Public, 1),
            report(2, MessageType::Public, 1),
            report(3, MessageType::Direct, 2),
        ];
        let ids: HashSet<ReportId> = [2, 3].into_iter().collect();
        let updated = apply_reviewed(&ids, &reports);

        assert_eq!(updated[0], reports[0]);
        assert_eq!(updated[1].status, ReportStatus::Reviewed);
        assert_eq!(updated[2].status, ReportStatus::Reviewed);
        assert_eq!(
            Report {
                status: ReportStatus::Pending,
                ..updated[1].clone()
            },
            reports[1]
        );
    }

    #[test]
    fn reviewed_is_idempotent() {
        let reports = vec![report(1, MessageType::Public, 1), report(2, MessageType::Public, 2)];
        let ids: HashSet<ReportId> = [1, 42].into_iter().collect();
        let once = apply_reviewed(&ids, &reports);
        let twice = apply_reviewed(&ids, &once);

        assert_eq!(once, twice);
    }
}
