use yew::{prelude::*, use_effect_with};
use yew_hooks::prelude::use_timeout;

use crate::i18n::current::error_banner as t;

/// Delay before a transient banner closes itself.
const AUTO_DISMISS_MS: u32 = 3000;

#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub enum BannerTone {
    #[default]
    Error,
    Success,
}

#[derive(Properties, PartialEq)]
pub struct ErrorBannerProps {
    pub message: AttrValue,
    #[prop_or_default]
    pub title: Option<AttrValue>,
    #[prop_or_default]
    pub tone: BannerTone,
    #[prop_or_default]
    pub on_close: Option<Callback<()>>,
    /// Errors stay until dismissed; confirmations fade out.
    #[prop_or(false)]
    pub auto_dismiss: bool,
}

#[function_component(ErrorBanner)]
pub fn error_banner(props: &ErrorBannerProps) -> Html {
    let is_open = use_state(|| true);

    let dismiss = {
        let is_open = is_open.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_: ()| {
            if !*is_open {
                return;
            }
            is_open.set(false);
            if let Some(cb) = on_close.as_ref() {
                cb.emit(());
            }
        })
    };

    let auto_timeout = {
        let dismiss = dismiss.clone();
        use_timeout(move || dismiss.emit(()), if props.auto_dismiss { AUTO_DISMISS_MS } else { 0 })
    };

    {
        let is_open = is_open.clone();
        use_effect_with(props.message.clone(), move |_| {
            is_open.set(true);
        });
    }

    {
        let auto_timeout = auto_timeout.clone();
        use_effect_with(
            (*is_open, props.auto_dismiss, props.message.clone()),
            move |(visible, auto_dismiss, _message)| {
                if *auto_dismiss && *visible {
                    auto_timeout.reset();
                } else {
                    auto_timeout.cancel();
                }
            },
        );
    }

    if props.message.trim().is_empty() || !*is_open {
        return Html::default();
    }

    let (tone_class, icon) = match props.tone {
        BannerTone::Error => ("banner-error", "fa-triangle-exclamation"),
        BannerTone::Success => ("banner-success", "fa-circle-check"),
    };
    let title = match (&props.title, props.tone) {
        (Some(title), _) => Some(title.clone()),
        (None, BannerTone::Error) => Some(AttrValue::from(t::TITLE)),
        (None, BannerTone::Success) => None,
    };
    let role = if props.tone == BannerTone::Error { "alert" } else { "status" };

    let close_button = {
        let dismiss = dismiss.clone();
        Callback::from(move |_: MouseEvent| dismiss.emit(()))
    };

    html! {
        <div
            class={classes!("banner", tone_class, "flex", "items-start", "gap-3", "rounded-xl", "px-5", "py-4", "text-sm")}
            {role}
        >
            <i class={classes!("fas", icon, "mt-1")} aria-hidden="true"></i>
            <div class="flex-1 space-y-1">
                if let Some(title) = title {
                    <p class="font-semibold">{ title }</p>
                }
                <p>{ props.message.clone() }</p>
            </div>
            <button
                type="button"
                class="btn-icon"
                aria-label={t::CLOSE_ARIA}
                onclick={close_button}
            >
                {"×"}
            </button>
        </div>
    }
}
