use leptos::prelude::*;

use crate::system::auth::context::{go, use_app_context, use_shell};

const SECTIONS: &[(&str, &str)] = &[
    ("/organizations", "Organizations"),
    ("/projects", "Projects"),
    ("/products", "Products"),
    ("/object-classes", "Object classes"),
    ("/users", "Users"),
    ("/roles", "Roles"),
    ("/logs", "Logs"),
];

/// Navigation sidebar shared by all pages under `/`
#[component]
pub fn SectionNav() -> impl IntoView {
    let context = use_app_context();
    let shell = use_shell();

    let user_name = move || {
        shell.revision.get();
        context
            .with_value(|c| c.store.user())
            .map(|u| if u.full_name.is_empty() { u.username } else { u.full_name })
            .unwrap_or_default()
    };

    let on_logout = move |_| {
        let login = context.with_value(|c| {
            c.store.logout();
            c.config.routes.login.clone()
        });
        go(context, &login);
    };

    view! {
        <nav class="sidebar">
            <div class="sidebar-user">{user_name}</div>
            <ul>
                {SECTIONS
                    .iter()
                    .map(move |(path, title)| {
                        let path = *path;
                        view! {
                            <li>
                                <a href=path on:click=move |ev| {
                                    ev.prevent_default();
                                    go(context, path);
                                }>{*title}</a>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
            <button class="btn-secondary" on:click=on_logout>"Log out"</button>
        </nav>
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="page-layout">
            <SectionNav />
            <main class="page-content">
                <h1>"MES Console"</h1>
                <p>"Select a section on the left."</p>
            </main>
        </div>
    }
}
