use modconsole_shared::persist::Theme;
use wasm_bindgen::{closure::Closure, JsCast};
use yew::prelude::*;

use crate::storage::{
    apply_theme, dark_scheme_query, load_theme, save_theme, saved_theme, theme_for_scheme,
};

#[derive(Clone, PartialEq)]
pub struct ThemeContext {
    pub theme: Theme,
    pub toggle: Callback<()>,
}

#[derive(Properties, PartialEq)]
pub struct ThemeProviderProps {
    #[prop_or_default]
    pub children: Children,
}

/// Theme to switch to when the system scheme changes. A saved preference
/// always wins.
fn follow_system(saved: Option<Theme>, prefers_dark: bool) -> Option<Theme> {
    match saved {
        Some(_) => None,
        None => Some(theme_for_scheme(prefers_dark)),
    }
}

#[function_component(ThemeProvider)]
pub fn theme_provider(props: &ThemeProviderProps) -> Html {
    let theme = use_state(load_theme);

    {
        use_effect_with(*theme, move |theme| {
            apply_theme(*theme);
        });
    }

    // Track the system scheme until the user picks one.
    {
        let theme = theme.clone();
        use_effect_with((), move |_| {
            let query = dark_scheme_query();
            let listener = query.as_ref().map(|query| {
                let closure = {
                    let query = query.clone();
                    Closure::<dyn FnMut()>::new(move || {
                        if let Some(next) = follow_system(saved_theme(), query.matches()) {
                            theme.set(next);
                        }
                    })
                };
                let _ = query
                    .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
                closure
            });

            move || {
                if let (Some(query), Some(closure)) = (query, listener) {
                    let _ = query.remove_event_listener_with_callback(
                        "change",
                        closure.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    }

    let toggle = {
        let theme = theme.clone();
        Callback::from(move |_: ()| {
            let next = theme.toggled();
            save_theme(next);
            theme.set(next);
        })
    };

    let context = ThemeContext {
        theme: *theme,
        toggle,
    };

    html! {
        <ContextProvider<ThemeContext> context={context}>
            { props.children.clone() }
        </ContextProvider<ThemeContext>>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_scheme_changes_apply_only_without_a_saved_choice() {
        assert_eq!(follow_system(None, true), Some(Theme::Dark));
        assert_eq!(follow_system(None, false), Some(Theme::Light));
        assert_eq!(follow_system(Some(Theme::Light), true), None);
    }
}
