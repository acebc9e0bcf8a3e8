use leptos::prelude::*;

use crate::system::auth::context::{use_app_context, use_shell};
use crate::system::store::Mutation;

/// Banner for store notices such as an expired session
#[component]
pub fn NoticeBar() -> impl IntoView {
    let context = use_app_context();
    let shell = use_shell();

    let messages = move || {
        shell.revision.get();
        context.with_value(|c| c.store.notices())
    };
    let dismiss = move |_| context.with_value(|c| c.store.commit(Mutation::DismissNotices));

    view! {
        <Show when=move || !messages().is_empty()>
            <div class="notice-bar">
                {move || {
                    messages()
                        .into_iter()
                        .map(|notice| view! { <span>{notice.message()}</span> })
                        .collect_view()
                }}
                <button class="btn-close" on:click=dismiss>"×"</button>
            </div>
        </Show>
    }
}
