//! Grouping of report rows by the message they target.

use std::collections::HashMap;

use crate::models::{MessageKey, Report};

/// All reports about one message, in fetch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportGroup {
    /// Target message.
    pub key: MessageKey,
    /// Reports in the order they were fetched. Never empty.
    pub reports: Vec<Report>,
}

impl ReportGroup {
    /// First report seen for this message.
    pub fn representative(&self) -> &Report {
        // Groups are only built by `group`, which never creates an empty one.
        &self.reports[0]
    }
}

/// Reports partitioned by [`MessageKey`], groups in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportGroups {
    groups: Vec<ReportGroup>,
    index: HashMap<MessageKey, usize>,
}

impl ReportGroups {
    /// Groups in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &ReportGroup> {
        self.groups.iter()
    }

    /// Number of distinct messages.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// No reports at all.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group for one message, if any report targets it.
    pub fn get(&self, key: &MessageKey) -> Option<&ReportGroup> {
        self.index.get(key).map(|&slot| &self.groups[slot])
    }

    /// Reports about one message; empty when none.
    pub fn reports_for(&self, key: &MessageKey) -> &[Report] {
        self.get(key)
            .map(|group| group.reports.as_slice())
            .unwrap_or_default()
    }
}

/// Partition `reports` by (message type, message id). Every report lands in
/// exactly one group; groups and their members keep input order.
pub fn group(reports: &[Report]) -> ReportGroups {
    let mut groups = ReportGroups::default();
    for report in reports {
        let key = report.message_key();
        match groups.index.get(&key) {
            Some(&slot) => groups.groups[slot].reports.push(report.clone()),
            None => {
                groups.index.insert(key, groups.groups.len());
                groups.groups.push(ReportGroup {
                    key,
                    reports: vec![report.clone()],
                });
            },
        }
    }
    groups
}

/// One representative per group: the first report seen for that message.
pub fn representatives_for(groups: &ReportGroups) -> Vec<Report> {
    groups
        .iter()
        .map(|group| group.representative().clone())
        .collect()
}
