use leptos::prelude::*;

use crate::layout::global_context::AppGlobalContext;
use crate::routes::navigator::Navigation;

/// App context as stored in the reactive owner. The context itself is
/// `Rc`-based, so it lives in local (non-`Send`) storage.
pub type AppContextValue = StoredValue<AppGlobalContext, LocalStorage>;

/// Reactive mirrors of the non-reactive app state
#[derive(Clone, Copy)]
pub struct ShellState {
    /// Last successful navigation
    pub route: RwSignal<Option<Navigation>>,
    /// Bumped on every store commit
    pub revision: RwSignal<u64>,
}

/// Install the app context and hook its change listeners into signals
pub fn provide_app_context(context: AppGlobalContext) -> ShellState {
    let shell = ShellState {
        route: RwSignal::new(context.navigator.current()),
        revision: RwSignal::new(0),
    };

    context
        .navigator
        .on_change(move |navigation| shell.route.set(Some(navigation.clone())));
    context
        .store
        .subscribe(move |_| shell.revision.update(|r| *r += 1));

    provide_context(StoredValue::new_local(context));
    provide_context(shell);
    shell
}

/// Hook to access the app context
pub fn use_app_context() -> AppContextValue {
    use_context::<AppContextValue>().expect("AppGlobalContext not found in component tree")
}

pub fn use_shell() -> ShellState {
    use_context::<ShellState>().expect("ShellState not found in component tree")
}

/// Navigate and log failures; pages have nothing better to do with them
pub fn go(context: AppContextValue, path: &str) {
    let navigator = context.with_value(|c| c.navigator.clone());
    if let Err(e) = navigator.navigate(path) {
        log::warn!("Navigation to {} failed: {}", path, e);
    }
}
