use leptos::prelude::*;
use leptos::task::spawn_local;

use super::home::SectionNav;
use crate::system::auth::context::use_app_context;
use crate::system::store::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
    Organization,
    ObjectClass,
}

/// Field/value pairs shown on a detail page
pub type Fields = Vec<(&'static str, String)>;

impl DetailKind {
    pub async fn load(&self, store: &SessionStore, id: &str) -> Result<Fields, String> {
        match self {
            DetailKind::Organization => store
                .fetch_organization(id)
                .await
                .map(|o| {
                    vec![
                        ("ID", o.id.to_string()),
                        ("Name", o.name),
                        ("Description", o.description),
                        ("Parent", o.parent_id.map(|p| p.to_string()).unwrap_or_default()),
                        ("Updated", o.updated_at.unwrap_or_default()),
                    ]
                })
                .map_err(|e| e.to_string()),
            DetailKind::ObjectClass => store
                .fetch_object_class(id)
                .await
                .map(|c| {
                    vec![
                        ("ID", c.id.to_string()),
                        ("Name", c.name),
                        ("Description", c.description),
                        ("Organization", c.org_id.to_string()),
                        (
                            "Parent class",
                            c.parent_class_id.map(|p| p.to_string()).unwrap_or_default(),
                        ),
                        ("Updated", c.updated_at.unwrap_or_default()),
                    ]
                })
                .map_err(|e| e.to_string()),
        }
    }
}

#[component]
pub fn RecordDetailPage(kind: DetailKind, id: String) -> impl IntoView {
    let context = use_app_context();
    let fields: RwSignal<Fields> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let store = context.with_value(|c| c.store.clone());
    spawn_local(async move {
        match kind.load(&store, &id).await {
            Ok(loaded) => fields.set(loaded),
            Err(e) => set_error.set(Some(e)),
        }
    });

    view! {
        <div class="page-layout">
            <SectionNav />
            <main class="page-content">
                <Show when=move || error.get().is_some()>
                    <div class="error-message">{move || error.get().unwrap_or_default()}</div>
                </Show>
                <dl class="details">
                    {move || {
                        fields
                            .get()
                            .into_iter()
                            .map(|(label, value)| view! { <dt>{label}</dt><dd>{value}</dd> })
                            .collect_view()
                    }}
                </dl>
            </main>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::shared::config::Config;
    use crate::shared::http::mock::MockTransport;
    use crate::shared::http::{ApiClient, Method};
    use crate::system::auth::session::SessionHandle;
    use crate::system::auth::storage::MemoryStorage;

    #[tokio::test]
    async fn test_load_object_class_fields() {
        let transport = MockTransport::new();
        transport.respond(
            Method::Get,
            "/object-classes/2",
            200,
            r#"{"id":2,"name":"Cell","org_id":1,"parent_class_id":1}"#,
        );
        let session =
            SessionHandle::restore(Rc::new(MemoryStorage::new()), Config::default().storage);
        let store = SessionStore::new(session, ApiClient::new("/api", transport.handle()));

        let fields = DetailKind::ObjectClass.load(&store, "2").await.unwrap();
        assert_eq!(fields[1], ("Name", "Cell".to_string()));
        assert_eq!(fields[4], ("Parent class", "1".to_string()));
    }
}
