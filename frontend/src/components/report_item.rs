use chrono::{DateTime, Utc};
use modconsole_shared::{
    format::{relative_time, status_badge_class, truncate, PREVIEW_CHARS},
    models::Report,
};
use yew::prelude::*;

use crate::i18n::{current::dashboard as t, fill_one};

#[derive(Properties, PartialEq)]
pub struct ReportItemProps {
    /// Representative of its message group.
    pub report: Report,
    /// Reports held for the same message.
    pub group_size: usize,
    pub now: DateTime<Utc>,
    pub on_select: Callback<Report>,
}

#[function_component(ReportItem)]
pub fn report_item(props: &ReportItemProps) -> Html {
    let report = &props.report;

    let onclick = {
        let report = report.clone();
        let on_select = props.on_select.clone();
        Callback::from(move |_: MouseEvent| on_select.emit(report.clone()))
    };

    let preview = report
        .message
        .as_ref()
        .and_then(|message| message.content.as_deref())
        .map(|content| truncate(content, PREVIEW_CHARS))
        .unwrap_or_else(|| "No content available".to_string());
    let reporter = report
        .reporter
        .as_ref()
        .map(|user| user.label().to_string())
        .or_else(|| report.reporter_id.map(|id| format!("user {id}")));

    html! {
        <li>
            <button type="button" class="report-item" {onclick}>
                <div class="report-item-head">
                    <span class="badge badge-muted">{ report.message_type.label() }</span>
                    <span class={status_badge_class(report.status)}>{ report.status.as_str() }</span>
                    if props.group_size > 1 {
                        <span class="badge badge-count">{ fill_one(t::REPORT_COUNT_TEMPLATE, props.group_size) }</span>
                    }
                    <time class="report-item-time" datetime={report.created_at.clone()}>
                        { relative_time(&report.created_at, props.now) }
                    </time>
                </div>
                <p class="report-item-preview">{ preview }</p>
                <p class="report-item-meta">
                    <span>{ format!("{}: {}", t::REASON, report.reason) }</span>
                    if let Some(reporter) = reporter {
                        <span>{ fill_one(t::REPORTED_BY_TEMPLATE, reporter) }</span>
                    }
                </p>
            </button>
        </li>
    }
}
