//! Keeps the browser address bar and the navigator in step.
//!
//! Every successful navigation is written to `window.history`; redirects
//! replace the entry the user asked for instead of stacking a new one. Back
//! and forward (`popstate`) are fed back into the navigator.

use super::navigator::Navigation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Push,
    Replace,
}

/// How to record `navigation` given the path currently in the address bar
pub fn history_action(location_path: &str, navigation: &Navigation) -> Option<HistoryAction> {
    if location_path == navigation.path {
        return None;
    }
    if navigation.redirected_from.as_deref() == Some(location_path) {
        Some(HistoryAction::Replace)
    } else {
        Some(HistoryAction::Push)
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::install;

#[cfg(target_arch = "wasm32")]
mod browser {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};

    use super::{history_action, HistoryAction};
    use crate::routes::navigator::Navigator;

    fn location_path() -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    /// Mirror navigations into `window.history` and follow back/forward
    pub fn install(navigator: &Navigator) {
        navigator.on_change(|navigation| {
            let Some(action) = history_action(&location_path(), navigation) else {
                return;
            };
            let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
                return;
            };
            let url = Some(navigation.path.as_str());
            let result = match action {
                HistoryAction::Push => history.push_state_with_url(&JsValue::NULL, "", url),
                HistoryAction::Replace => history.replace_state_with_url(&JsValue::NULL, "", url),
            };
            if result.is_err() {
                log::warn!("history: failed to record {}", navigation.path);
            }
        });

        let Some(window) = web_sys::window() else {
            return;
        };
        let navigator = navigator.clone();
        let on_popstate = Closure::<dyn FnMut()>::new(move || {
            let path = location_path();
            if let Err(e) = navigator.navigate(&path) {
                log::warn!("Navigation to {} failed: {}", path, e);
            }
        });
        if window
            .add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("history: failed to listen for popstate");
        }
        // lives as long as the page
        on_popstate.forget();
    }
}
