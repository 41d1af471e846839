use std::fmt::Write as _;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use modconsole_shared::{
    dashboard::{ActionOutcome, ModerationAction},
    format::{format_timestamp, relative_time, truncate, PREVIEW_CHARS},
    models::{Message, MessageKey, Report, ReportStatus},
    ActionError, DashboardController,
};
use serde_json::json;

use super::{print_json, App};

/// Fetch the report set through a fresh controller.
pub async fn load(app: &App, status: Option<ReportStatus>) -> Result<DashboardController> {
    let mut dashboard = DashboardController::new();
    dashboard.set_status_filter(app.api.as_ref(), status).await?;
    Ok(dashboard)
}

pub async fn list(app: &App, status: Option<ReportStatus>) -> Result<()> {
    app.require_session().await?;
    let dashboard = load(app, status).await?;
    if app.config.json {
        return print_json(&dashboard.representatives());
    }
    print!("{}", render_report_list(&dashboard, Utc::now()));
    Ok(())
}

pub async fn show(app: &App, key: MessageKey) -> Result<()> {
    app.require_session().await?;
    let mut dashboard = load(app, None).await?;
    let representative = dashboard
        .groups()
        .get(&key)
        .map(|group| group.representative().clone());

    let (message, reports) = match representative {
        Some(report) => {
            dashboard.select_message(app.api.as_ref(), &report).await?;
            match dashboard.selection() {
                Some(selection) => (selection.message.clone(), selection.reports.clone()),
                None => bail!("message {key} could not be loaded"),
            }
        },
        None => (app.api.message_detail(key).await?, Vec::new()),
    };

    if app.config.json {
        return print_json(&json!({ "message": message, "reports": reports }));
    }
    print!("{}", render_message(&message, &reports, Utc::now()));
    Ok(())
}

pub async fn delete(app: &App, key: MessageKey) -> Result<()> {
    app.require_session().await?;
    let mut dashboard = load(app, None).await?;
    let outcome = dashboard
        .perform_action(app.api.as_ref(), &ModerationAction::Delete {
            key,
        })
        .await
        .map_err(action_error)?;
    report_outcome(app, &outcome)
}

pub async fn clear(app: &App, key: MessageKey) -> Result<()> {
    app.require_session().await?;
    let mut dashboard = load(app, None).await?;
    let report_ids: Vec<i64> = dashboard
        .groups()
        .reports_for(&key)
        .iter()
        .map(|report| report.id)
        .collect();
    if report_ids.is_empty() {
        bail!("no reports about message {key}");
    }

    let outcome = dashboard
        .perform_action(app.api.as_ref(), &ModerationAction::ClearReports {
            key,
            report_ids,
        })
        .await
        .map_err(action_error)?;
    report_outcome(app, &outcome)
}

pub async fn mute(app: &App, key: MessageKey) -> Result<()> {
    let moderator = app.require_session().await?;
    let mut dashboard = load(app, None).await?;
    let Some(report) = dashboard
        .groups()
        .get(&key)
        .map(|group| group.representative().clone())
    else {
        bail!("no reports about message {key}");
    };
    dashboard.select_message(app.api.as_ref(), &report).await?;

    let action = dashboard.mute_author_action(moderator.id).map_err(action_error)?;
    let outcome = dashboard
        .perform_action(app.api.as_ref(), &action)
        .await
        .map_err(action_error)?;
    report_outcome(app, &outcome)
}

fn action_error(err: ActionError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

fn report_outcome(app: &App, outcome: &ActionOutcome) -> Result<()> {
    if app.config.json {
        let failed: Vec<_> = match outcome {
            ActionOutcome::Reviewed {
                failed, ..
            } => failed
                .iter()
                .map(|(id, err)| json!({ "report_id": id, "error": err.to_string() }))
                .collect(),
            _ => Vec::new(),
        };
        return print_json(&json!({ "summary": outcome.summary(), "failed": failed }));
    }
    println!("{}", outcome.summary());
    if let ActionOutcome::Reviewed {
        failed, ..
    } = outcome
    {
        for (report_id, err) in failed {
            println!("  report {report_id}: {}", err.user_message());
        }
    }
    Ok(())
}

/// Report list, one entry per reported message.
pub fn render_report_list(dashboard: &DashboardController, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let counts = dashboard
        .status_counts()
        .iter()
        .map(|(status, count)| format!("{status}: {count}"))
        .collect::<Vec<_>>()
        .join("  ");
    let filter = dashboard
        .status_filter()
        .map_or("all", ReportStatus::as_str);
    let _ = writeln!(out, "Filter: {filter}    {counts}");

    if dashboard.groups().is_empty() {
        let _ = writeln!(out, "No reports found.");
        return out;
    }
    for group in dashboard.groups().iter() {
        let report = group.representative();
        let _ = writeln!(
            out,
            "{:<14} {:>2} report(s)  {:<9}  {}",
            group.key.to_string(),
            group.reports.len(),
            report.status.as_str(),
            relative_time(&report.created_at, now),
        );
        let _ = writeln!(out, "    reason: {}", report.reason);
        let _ = writeln!(out, "    > {}", preview(report));
    }
    out
}

fn preview(report: &Report) -> String {
    report
        .message
        .as_ref()
        .and_then(|message| message.content.as_deref())
        .map(|content| truncate(content, PREVIEW_CHARS))
        .unwrap_or_else(|| "No content available".to_string())
}

/// Full message with the reports filed against it.
pub fn render_message(message: &Message, reports: &[Report], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} #{}", message.message_type.label(), message.id);
    let _ = writeln!(out, "Author: {}", message.author.author_label());
    if let Some(created_at) = message.created_at.as_deref() {
        let _ = writeln!(out, "Posted: {}", format_timestamp(created_at));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", message.content_or_placeholder());
    let _ = writeln!(out);
    if reports.is_empty() {
        let _ = writeln!(out, "No reports.");
        return out;
    }
    let _ = writeln!(out, "Reports ({}):", reports.len());
    for report in reports {
        let reporter = report
            .reporter
            .as_ref()
            .map(|user| user.label().to_string())
            .or_else(|| report.reporter_id.map(|id| format!("user {id}")))
            .unwrap_or_else(|| "Unknown".to_string());
        let _ = writeln!(
            out,
            "  #{:<5} {:<9} {:<16} {} ({})",
            report.id,
            report.status.as_str(),
            reporter,
            report.reason,
            relative_time(&report.created_at, now),
        );
    }
    out
}
