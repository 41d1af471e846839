//! Report moderation dashboard.
//!
//! All state lives in a [`DashboardController`] behind a `RefCell`. Network
//! calls run between its `begin_*` and `finish_*` halves so no borrow is
//! held across an await, and the controller drops any response that is no
//! longer the latest of its kind. Unmounting tears the controller down.

use std::{cell::RefCell, rc::Rc};

use chrono::Utc;
use modconsole_shared::{
    dashboard::{execute_action, TicketOutcome},
    models::{Report, ReportStatus},
    ActionError, ApiError, DashboardController, ModerationApi,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::{
    api::console_error,
    components::{
        error_banner::{BannerTone, ErrorBanner},
        loading_spinner::{LoadingSpinner, SpinnerSize},
        message_view::MessageView,
        report_item::ReportItem,
        stats_card::StatsCard,
    },
    i18n::current::dashboard as t,
    session::{use_session, SessionContext},
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum ActionKind {
    Clear,
    Mute,
    Delete,
}

type SharedController = Rc<RefCell<DashboardController>>;

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    match use_session() {
        Some(session) => html! { <Dashboard {session} /> },
        None => Html::default(),
    }
}

#[derive(Properties, PartialEq)]
struct DashboardProps {
    session: SessionContext,
}

fn filter_label(status: Option<ReportStatus>) -> &'static str {
    match status {
        None => t::FILTER_ALL,
        Some(ReportStatus::Pending) => t::FILTER_PENDING,
        Some(ReportStatus::Reviewed) => t::FILTER_REVIEWED,
        Some(ReportStatus::Dismissed) => t::FILTER_DISMISSED,
    }
}

#[function_component(Dashboard)]
fn dashboard(props: &DashboardProps) -> Html {
    let controller: SharedController = use_mut_ref(DashboardController::new);
    let force_update = use_force_update();
    let working = use_state(|| false);
    let api: Rc<dyn ModerationApi> = props.session.api.clone();
    let moderator_id = props.session.identity().map(|identity| identity.id);

    // 401/403 mid-session: the cookie is gone, drop back to the login page.
    let on_api_error = {
        let session = props.session.clone();
        Callback::from(move |err: ApiError| {
            if err.is_auth_rejected() {
                session.store.invalidate();
                session.sync.emit(());
            }
        })
    };

    let load_reports = {
        let controller = controller.clone();
        let api = api.clone();
        let force_update = force_update.clone();
        let on_api_error = on_api_error.clone();
        Callback::from(move |status: Option<ReportStatus>| {
            let ticket = controller.borrow_mut().begin_fetch(status);
            force_update.force_update();

            let controller = controller.clone();
            let api = api.clone();
            let force_update = force_update.clone();
            let on_api_error = on_api_error.clone();
            spawn_local(async move {
                let result = api.list_reports(ticket.status()).await;
                let outcome = controller.borrow_mut().finish_fetch(ticket, result);
                match outcome {
                    Ok(TicketOutcome::Discarded) => return,
                    Ok(TicketOutcome::Applied) => {},
                    Err(err) => {
                        console_error(&format!("Failed to load reports: {err}"));
                        on_api_error.emit(err);
                    },
                }
                force_update.force_update();
            });
        })
    };

    let load_stats = {
        let controller = controller.clone();
        let api = api.clone();
        let force_update = force_update.clone();
        Callback::from(move |_: ()| {
            let ticket = controller.borrow_mut().begin_stats();
            let controller = controller.clone();
            let api = api.clone();
            let force_update = force_update.clone();
            spawn_local(async move {
                let result = api.dashboard_stats().await;
                if let Err(err) = &result {
                    console_error(&format!("Error loading stats: {err}"));
                }
                if controller.borrow_mut().finish_stats(ticket, result) == TicketOutcome::Applied {
                    force_update.force_update();
                }
            });
        })
    };

    {
        let controller = controller.clone();
        let load_reports = load_reports.clone();
        let load_stats = load_stats.clone();
        use_effect_with((), move |_| {
            load_reports.emit(None);
            load_stats.emit(());
            move || controller.borrow_mut().teardown()
        });
    }

    let on_select = {
        let controller = controller.clone();
        let api = api.clone();
        let force_update = force_update.clone();
        let on_api_error = on_api_error.clone();
        Callback::from(move |report: Report| {
            let ticket = controller.borrow_mut().begin_selection(&report);
            force_update.force_update();

            let controller = controller.clone();
            let api = api.clone();
            let force_update = force_update.clone();
            let on_api_error = on_api_error.clone();
            spawn_local(async move {
                let result = api.message_detail(ticket.key()).await;
                match controller.borrow_mut().finish_selection(ticket, result) {
                    Ok(TicketOutcome::Discarded) => return,
                    Ok(TicketOutcome::Applied) => {},
                    Err(err) => {
                        console_error(&format!("Error getting message details: {err}"));
                        on_api_error.emit(err);
                    },
                }
                force_update.force_update();
            });
        })
    };

    let on_dismiss = {
        let controller = controller.clone();
        let force_update = force_update.clone();
        Callback::from(move |_: ()| {
            controller.borrow_mut().dismiss_selection();
            force_update.force_update();
        })
    };

    let run_action = {
        let controller = controller.clone();
        let api = api.clone();
        let force_update = force_update.clone();
        let working = working.clone();
        let load_stats = load_stats.clone();
        let on_api_error = on_api_error.clone();
        Callback::from(move |kind: ActionKind| {
            if *working {
                return;
            }
            let built = {
                let dashboard = controller.borrow();
                match kind {
                    ActionKind::Delete => dashboard.delete_action(),
                    ActionKind::Clear => dashboard.clear_reports_action(),
                    ActionKind::Mute => match moderator_id {
                        Some(moderator_id) => dashboard.mute_author_action(moderator_id),
                        None => Err(ActionError::Unavailable("No moderator session".to_string())),
                    },
                }
            };
            let action = match built {
                Ok(action) => action,
                Err(err) => {
                    controller.borrow_mut().record_action_error(&err);
                    force_update.force_update();
                    return;
                },
            };

            controller.borrow_mut().begin_action();
            working.set(true);

            let controller = controller.clone();
            let api = api.clone();
            let force_update = force_update.clone();
            let working = working.clone();
            let load_stats = load_stats.clone();
            let on_api_error = on_api_error.clone();
            spawn_local(async move {
                let receipt = execute_action(api.as_ref(), &action).await;
                let result = controller.borrow_mut().complete_action(&action, receipt);
                working.set(false);
                match result {
                    Ok(_) => load_stats.emit(()),
                    Err(ActionError::Remote(err)) => on_api_error.emit(err),
                    Err(_) => {},
                }
                force_update.force_update();
            });
        })
    };

    let on_clear_error = {
        let controller = controller.clone();
        let force_update = force_update.clone();
        Callback::from(move |_: ()| {
            controller.borrow_mut().clear_error();
            force_update.force_update();
        })
    };
    let on_clear_notice = {
        let controller = controller.clone();
        Callback::from(move |_: ()| controller.borrow_mut().clear_notice())
    };

    let dashboard = controller.borrow();
    let now = Utc::now();
    let stats = dashboard.stats().copied();
    let active_filter = dashboard.status_filter();
    let counts = dashboard.status_counts();

    let filter_buttons = std::iter::once(None)
        .chain(ReportStatus::ALL.into_iter().map(Some))
        .map(|status| {
            let count = match status {
                None => dashboard.reports().len(),
                Some(status) => counts
                    .iter()
                    .find(|(candidate, _)| *candidate == status)
                    .map_or(0, |(_, count)| *count),
            };
            let onclick = {
                let load_reports = load_reports.clone();
                Callback::from(move |_: MouseEvent| load_reports.emit(status))
            };
            let active = status == active_filter;
            html! {
                <button
                    type="button"
                    class={classes!("filter-button", active.then_some("active"))}
                    aria-pressed={active.to_string()}
                    {onclick}
                >
                    { filter_label(status) }
                    <span class="filter-count">{ count }</span>
                </button>
            }
        })
        .collect::<Html>();

    let on_refresh = {
        let load_reports = load_reports.clone();
        let load_stats = load_stats.clone();
        Callback::from(move |_: MouseEvent| {
            load_reports.emit(active_filter);
            load_stats.emit(());
        })
    };

    let representatives = dashboard.representatives();
    let list = if dashboard.is_loading() && representatives.is_empty() {
        html! { <LoadingSpinner size={SpinnerSize::Large} /> }
    } else if representatives.is_empty() {
        html! { <p class="empty-state">{ t::EMPTY }</p> }
    } else {
        html! {
            <ul class="report-list">
                { for representatives.into_iter().map(|report| {
                    let group_size = dashboard.groups().reports_for(&report.message_key()).len();
                    let key = format!("{}", report.message_key());
                    html! {
                        <ReportItem
                            {key}
                            {report}
                            {group_size}
                            {now}
                            on_select={on_select.clone()}
                        />
                    }
                }) }
            </ul>
        }
    };

    let modal = dashboard.selection().map(|selection| {
        let action = |kind: ActionKind| {
            let run_action = run_action.clone();
            Callback::from(move |_: ()| run_action.emit(kind))
        };
        html! {
            <MessageView
                selection={selection.clone()}
                {now}
                working={*working}
                on_close={on_dismiss.clone()}
                on_clear={action(ActionKind::Clear)}
                on_mute={action(ActionKind::Mute)}
                on_delete={action(ActionKind::Delete)}
            />
        }
    });

    html! {
        <section class="dashboard">
            if let Some(error) = dashboard.error() {
                <ErrorBanner message={error.to_string()} on_close={on_clear_error} />
            }
            if let Some(notice) = dashboard.notice() {
                <ErrorBanner
                    message={notice.to_string()}
                    tone={BannerTone::Success}
                    auto_dismiss={true}
                    on_close={on_clear_notice}
                />
            }

            <div class="stats-grid">
                <StatsCard icon="fa-flag" label={t::STAT_PENDING} value={stats.map(|s| s.pending_reports)} accent={true} />
                <StatsCard icon="fa-list" label={t::STAT_TOTAL} value={stats.map(|s| s.total_reports)} />
                <StatsCard icon="fa-user-slash" label={t::STAT_BLOCKED} value={stats.map(|s| s.blocked_users)} />
                <StatsCard icon="fa-comments" label={t::STAT_MESSAGES} value={stats.map(|s| s.total_messages())} />
            </div>

            <div class="toolbar">
                <div class="filter-bar" role="group" aria-label={t::FILTER_ARIA}>
                    { filter_buttons }
                </div>
                <button
                    type="button"
                    class="btn btn-secondary"
                    onclick={on_refresh}
                    disabled={dashboard.is_loading()}
                >
                    <i class={classes!("fas", "fa-rotate", dashboard.is_loading().then_some("fa-spin"))} aria-hidden="true"></i>
                    { t::REFRESH }
                </button>
            </div>

            { list }
            { modal.unwrap_or_default() }
        </section>
    }
}
