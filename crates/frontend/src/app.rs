use crate::layout::global_context::AppGlobalContext;
use crate::routes::routes::AppRoutes;
use crate::system::auth::context::provide_app_context;
use leptos::prelude::*;

#[cfg(target_arch = "wasm32")]
fn initial_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn initial_path() -> String {
    "/".to_string()
}

#[component]
pub fn App() -> impl IntoView {
    let context = match AppGlobalContext::from_environment() {
        Ok(context) => context,
        Err(e) => {
            log::error!("Startup failed: {}", e);
            let message = e.to_string();
            return view! { <div class="error-message">{message}</div> }.into_any();
        }
    };

    // Provide the AppGlobalContext to the whole app via context.
    let navigator = context.navigator.clone();
    provide_app_context(context);
    #[cfg(target_arch = "wasm32")]
    crate::routes::history::install(&navigator);

    let path = initial_path();
    if let Err(e) = navigator.navigate(&path) {
        log::warn!("Initial navigation to {} failed: {}", path, e);
    }

    view! {
        <AppRoutes />
    }
    .into_any()
}
