use modconsole_shared::persist::Theme;
use yew::prelude::*;

use crate::{i18n::current::theme_toggle as t, theme::ThemeContext};

#[derive(Properties, PartialEq)]
pub struct ThemeToggleProps {
    #[prop_or_default]
    pub class: Classes,
}

#[function_component(ThemeToggle)]
pub fn theme_toggle(props: &ThemeToggleProps) -> Html {
    let Some(theme) = use_context::<ThemeContext>() else {
        return Html::default();
    };
    let is_dark = theme.theme == Theme::Dark;

    let onclick = {
        let toggle = theme.toggle.clone();
        Callback::from(move |_: MouseEvent| toggle.emit(()))
    };

    let label = if is_dark { t::SWITCH_TO_LIGHT } else { t::SWITCH_TO_DARK };
    let icon_class = if is_dark { "fa-sun" } else { "fa-moon" };

    html! {
        <button
            type="button"
            class={classes!("btn-icon", props.class.clone())}
            {onclick}
            aria-label={label}
            title={label}
            aria-pressed={is_dark.to_string()}
        >
            <i class={classes!("fas", icon_class)} aria-hidden="true"></i>
            <span class="sr-only">{ label }</span>
        </button>
    }
}
