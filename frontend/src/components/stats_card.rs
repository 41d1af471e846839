use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StatsCardProps {
    pub icon: AttrValue,
    pub label: AttrValue,
    /// `None` while the stats have not loaded.
    pub value: Option<u64>,
    /// Highlight, used for the pending count.
    #[prop_or(false)]
    pub accent: bool,
}

#[function_component(StatsCard)]
pub fn stats_card(props: &StatsCardProps) -> Html {
    let value = props
        .value
        .map_or_else(|| "-".to_string(), |value| value.to_string());

    html! {
        <div class={classes!("stats-card", props.accent.then_some("stats-card-accent"))} role="status">
            <i class={classes!("fas", props.icon.to_string(), "stats-card-icon")} aria-hidden="true"></i>
            <div>
                <strong class="stats-card-value">{ value }</strong>
                <span class="stats-card-label">{ props.label.clone() }</span>
            </div>
        </div>
    }
}
