use chrono::{DateTime, Utc};
use modconsole_shared::{
    dashboard::Selection,
    format::{format_timestamp, relative_time, status_badge_class},
    models::Report,
};
use yew::prelude::*;

use crate::i18n::{current::message_view as t, fill_one};

/// Ask the browser for a yes/no confirmation.
fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|win| win.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[derive(Properties, PartialEq)]
pub struct MessageViewProps {
    pub selection: Selection,
    pub now: DateTime<Utc>,
    /// An action is in flight; buttons are disabled.
    pub working: bool,
    pub on_close: Callback<()>,
    pub on_clear: Callback<()>,
    pub on_mute: Callback<()>,
    pub on_delete: Callback<()>,
}

#[function_component(MessageView)]
pub fn message_view(props: &MessageViewProps) -> Html {
    let message = &props.selection.message;
    let reports = &props.selection.reports;
    let author = message.author.author_label().to_string();

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let on_keydown = {
        let on_close = props.on_close.clone();
        Callback::from(move |event: KeyboardEvent| {
            if event.key() == "Escape" {
                on_close.emit(());
            }
        })
    };
    let clear = {
        let on_clear = props.on_clear.clone();
        Callback::from(move |_: MouseEvent| {
            if confirm(t::CONFIRM_CLEAR) {
                on_clear.emit(());
            }
        })
    };
    let mute = {
        let on_mute = props.on_mute.clone();
        let author = author.clone();
        Callback::from(move |_: MouseEvent| {
            if confirm(&fill_one(t::CONFIRM_MUTE_TEMPLATE, &author)) {
                on_mute.emit(());
            }
        })
    };
    let delete = {
        let on_delete = props.on_delete.clone();
        Callback::from(move |_: MouseEvent| {
            if confirm(t::CONFIRM_DELETE) {
                on_delete.emit(());
            }
        })
    };

    let can_mute = message.author.author_id().is_some();

    html! {
        <div class="modal-backdrop" onclick={close.clone()}>
            <div
                class="modal"
                role="dialog"
                aria-modal="true"
                aria-labelledby="message-view-title"
                tabindex="-1"
                onkeydown={on_keydown}
                onclick={Callback::from(|event: MouseEvent| event.stop_propagation())}
            >
                <div class="modal-head">
                    <h2 id="message-view-title">
                        { format!("{} #{}", message.message_type.label(), message.id) }
                    </h2>
                    <button type="button" class="btn-icon" aria-label={t::CLOSE_ARIA} onclick={close}>
                        {"×"}
                    </button>
                </div>

                <dl class="message-meta">
                    <dt>{ t::AUTHOR }</dt>
                    <dd>{ author.clone() }</dd>
                    if let Some(created_at) = message.created_at.as_deref() {
                        <dt>{ t::POSTED }</dt>
                        <dd>{ format_timestamp(created_at) }</dd>
                    }
                </dl>
                <p class="message-content">{ message.content_or_placeholder().to_string() }</p>

                <h3>{ fill_one(t::REPORTS_TEMPLATE, reports.len()) }</h3>
                if reports.is_empty() {
                    <p class="muted">{ t::NO_REPORTS }</p>
                } else {
                    <ul class="report-list-compact">
                        { for reports.iter().map(|report| render_report(report, props.now)) }
                    </ul>
                }

                <div class="modal-actions">
                    <button
                        type="button"
                        class="btn btn-secondary"
                        onclick={clear}
                        disabled={props.working || reports.is_empty()}
                    >
                        <i class="fas fa-check" aria-hidden="true"></i>
                        { t::CLEAR }
                    </button>
                    <button
                        type="button"
                        class="btn btn-warning"
                        onclick={mute}
                        disabled={props.working || !can_mute}
                    >
                        <i class="fas fa-volume-xmark" aria-hidden="true"></i>
                        { t::MUTE }
                    </button>
                    <button
                        type="button"
                        class="btn btn-danger"
                        onclick={delete}
                        disabled={props.working}
                    >
                        <i class="fas fa-trash" aria-hidden="true"></i>
                        { if props.working { t::WORKING } else { t::DELETE } }
                    </button>
                </div>
            </div>
        </div>
    }
}

fn render_report(report: &Report, now: DateTime<Utc>) -> Html {
    let reporter = report
        .reporter
        .as_ref()
        .map(|user| user.label().to_string())
        .or_else(|| report.reporter_id.map(|id| format!("user {id}")))
        .unwrap_or_else(|| t::UNKNOWN_REPORTER.to_string());

    html! {
        <li key={report.id}>
            <span class={status_badge_class(report.status)}>{ report.status.as_str() }</span>
            <strong>{ reporter }</strong>
            <span>{ report.reason.clone() }</span>
            <time datetime={report.created_at.clone()}>{ relative_time(&report.created_at, now) }</time>
        </li>
    }
}
