use leptos::prelude::*;
use leptos::task::spawn_local;

use super::home::SectionNav;
use crate::system::auth::context::{use_app_context, use_shell};
use crate::system::store::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Organizations,
    Projects,
    Products,
    Users,
    Roles,
    Logs,
    ObjectClasses,
}

/// One table row: id plus two display columns
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: u64,
    pub title: String,
    pub detail: String,
}

impl ListKind {
    pub fn from_route(name: &str) -> Option<Self> {
        Some(match name {
            "Organizations" => ListKind::Organizations,
            "Projects" => ListKind::Projects,
            "Products" => ListKind::Products,
            "Users" => ListKind::Users,
            "Roles" => ListKind::Roles,
            "Logs" => ListKind::Logs,
            "ObjectClasses" => ListKind::ObjectClasses,
            _ => return None,
        })
    }

    pub fn title(&self) -> &'static str {
        match self {
            ListKind::Organizations => "Organizations",
            ListKind::Projects => "Projects",
            ListKind::Products => "Products",
            ListKind::Users => "Users",
            ListKind::Roles => "Roles",
            ListKind::Logs => "Logs",
            ListKind::ObjectClasses => "Object classes",
        }
    }

    /// Run the store action for this kind; returns the number of records
    pub async fn fetch(&self, store: &SessionStore) -> Result<usize, String> {
        let count = match self {
            ListKind::Organizations => store.fetch_organizations().await.map(|v| v.len()),
            ListKind::Projects => store.fetch_projects().await.map(|v| v.len()),
            ListKind::Products => store.fetch_products().await.map(|v| v.len()),
            ListKind::Users => store.fetch_users().await.map(|v| v.len()),
            ListKind::Roles => store.fetch_roles().await.map(|v| v.len()),
            ListKind::Logs => store.fetch_logs().await.map(|v| v.len()),
            ListKind::ObjectClasses => store.fetch_object_classes().await.map(|v| v.len()),
        };
        count.map_err(|e| e.to_string())
    }

    /// Current cache contents, shaped for display
    pub fn rows(&self, store: &SessionStore) -> Vec<Row> {
        let state = store.state();
        match self {
            ListKind::Organizations => state
                .organizations
                .into_iter()
                .map(|o| Row { id: o.id, title: o.name, detail: o.description })
                .collect(),
            ListKind::Projects => state
                .projects
                .into_iter()
                .map(|p| Row { id: p.id, title: p.name, detail: p.status })
                .collect(),
            ListKind::Products => state
                .products
                .into_iter()
                .map(|p| Row {
                    id: p.id,
                    title: format!("{} {}", p.code, p.name),
                    detail: p.category,
                })
                .collect(),
            ListKind::Users => state
                .users
                .into_iter()
                .map(|u| Row { id: u.id, title: u.username, detail: u.email })
                .collect(),
            ListKind::Roles => state
                .roles
                .into_iter()
                .map(|r| Row { id: r.id, title: r.name, detail: r.description })
                .collect(),
            ListKind::Logs => state
                .logs
                .into_iter()
                .map(|l| Row {
                    id: l.id,
                    title: format!("{} {}", l.username, l.action),
                    detail: l.timestamp.or(l.created_at).unwrap_or_default(),
                })
                .collect(),
            ListKind::ObjectClasses => state
                .object_classes
                .into_iter()
                .map(|c| Row { id: c.id, title: c.name, detail: c.description })
                .collect(),
        }
    }
}

#[component]
pub fn EntityListPage(kind: ListKind) -> impl IntoView {
    let context = use_app_context();
    let shell = use_shell();
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(true);

    let store = context.with_value(|c| c.store.clone());
    spawn_local(async move {
        if let Err(e) = kind.fetch(&store).await {
            set_error.set(Some(e));
        }
        set_loading.set(false);
    });

    let rows = move || {
        shell.revision.get();
        context.with_value(|c| kind.rows(&c.store))
    };

    view! {
        <div class="page-layout">
            <SectionNav />
            <main class="page-content">
                <h1>{kind.title()}</h1>
                <Show when=move || loading.get()>
                    <div class="loading">"Loading..."</div>
                </Show>
                <Show when=move || error.get().is_some()>
                    <div class="error-message">{move || error.get().unwrap_or_default()}</div>
                </Show>
                <table class="data-table">
                    <tbody>
                        {move || {
                            rows()
                                .into_iter()
                                .map(|row| {
                                    view! {
                                        <tr>
                                            <td>{row.id}</td>
                                            <td>{row.title}</td>
                                            <td>{row.detail}</td>
                                        </tr>
                                    }
                                })
                                .collect_view()
                        }}
                    </tbody>
                </table>
            </main>
        </div>
    }
}
