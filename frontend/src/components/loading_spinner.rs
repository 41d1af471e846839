use yew::prelude::*;

use crate::i18n::current::common as t;

#[derive(Clone, Copy, PartialEq)]
pub enum SpinnerSize {
    Small,
    Medium,
    Large,
}

impl SpinnerSize {
    fn dimension(self) -> u32 {
        match self {
            SpinnerSize::Small => 20,
            SpinnerSize::Medium => 36,
            SpinnerSize::Large => 56,
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct LoadingSpinnerProps {
    #[prop_or(SpinnerSize::Medium)]
    pub size: SpinnerSize,
    /// Cover the whole viewport, used while the session is being checked.
    #[prop_or(false)]
    pub fullscreen: bool,
    #[prop_or_default]
    pub label: Option<AttrValue>,
}

#[function_component(LoadingSpinner)]
pub fn loading_spinner(props: &LoadingSpinnerProps) -> Html {
    let spinner_style = format!("--spinner-size:{}px;", props.size.dimension());
    let label = props.label.clone().unwrap_or_else(|| AttrValue::from(t::LOADING));

    let spinner = html! {
        <div class="spinner-wrap" role="status" aria-live="polite" aria-busy="true">
            <div style={spinner_style} class="spinner" />
            <span class="sr-only">{ label }</span>
        </div>
    };

    if props.fullscreen {
        html! {
            <div class="spinner-overlay">
                { spinner }
            </div>
        }
    } else {
        spinner
    }
}
