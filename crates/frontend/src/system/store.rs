//! Session store: the token/profile session plus cached entity lists.
//!
//! State changes only through [`SessionStore::commit`]. Actions (`login`,
//! `fetch_*`, ...) talk to the API and then commit the matching mutation.
//! Caches are replaced wholesale; when two fetches of the same kind overlap,
//! the one that completes last wins.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use contracts::domain::a001_organization::Organization;
use contracts::domain::a002_project::Project;
use contracts::domain::a003_product::Product;
use contracts::domain::a004_object_class::ObjectClass;
use contracts::system::auth::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserProfile,
};
use contracts::system::logs::LogEntry;
use contracts::system::roles::Role;
use contracts::system::users::User;

use crate::domain::{api as resources, Resource};
use crate::shared::http::middleware::bearer;
use crate::shared::http::{ApiClient, ApiError, AUTHORIZATION};
use crate::system::auth::api as auth_api;
use crate::system::auth::session::{Session, SessionHandle};

/// User-visible notices raised by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    SessionExpired,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::SessionExpired => "Session expired, please log in again",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SetToken(String),
    SetUser(UserProfile),
    SetOrganizations(Vec<Organization>),
    SetProjects(Vec<Project>),
    SetProducts(Vec<Product>),
    SetUsers(Vec<User>),
    SetRoles(Vec<Role>),
    SetLogs(Vec<LogEntry>),
    SetObjectClasses(Vec<ObjectClass>),
    ClearAuth,
    PushNotice(Notice),
    DismissNotices,
}

#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub organizations: Vec<Organization>,
    pub projects: Vec<Project>,
    pub products: Vec<Product>,
    pub users: Vec<User>,
    pub roles: Vec<Role>,
    pub logs: Vec<LogEntry>,
    pub object_classes: Vec<ObjectClass>,
    pub notices: Vec<Notice>,
}

type Listener = Rc<dyn Fn(&Mutation)>;

struct StoreInner {
    session: SessionHandle,
    client: ApiClient,
    state: RefCell<StoreState>,
    listeners: RefCell<Vec<Listener>>,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<StoreInner>,
}

/// Non-owning store handle for middleware owned by the store's own client
#[derive(Clone)]
pub struct WeakSessionStore {
    inner: Weak<StoreInner>,
}

impl WeakSessionStore {
    pub fn upgrade(&self) -> Option<SessionStore> {
        self.inner.upgrade().map(|inner| SessionStore { inner })
    }
}

impl SessionStore {
    pub fn new(session: SessionHandle, client: ApiClient) -> Self {
        Self::new_cyclic(session, |_| client)
    }

    /// Build the store together with a client whose middleware needs to call
    /// back into the store (e.g. logout on 401).
    pub fn new_cyclic(
        session: SessionHandle,
        build_client: impl FnOnce(WeakSessionStore) -> ApiClient,
    ) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<StoreInner>| {
            let client = build_client(WeakSessionStore {
                inner: weak.clone(),
            });
            StoreInner {
                session,
                client,
                state: RefCell::new(StoreState::default()),
                listeners: RefCell::new(Vec::new()),
            }
        });

        let store = Self { inner };
        if let Some(token) = store.token() {
            store
                .inner
                .client
                .set_default_header(AUTHORIZATION, bearer(&token));
        }
        store
    }

    pub fn downgrade(&self) -> WeakSessionStore {
        WeakSessionStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    /// Register a callback run after every committed mutation
    pub fn subscribe(&self, listener: impl Fn(&Mutation) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Apply a mutation. This is the only way store state changes.
    pub fn commit(&self, mutation: Mutation) {
        log::debug!("commit {}", mutation_name(&mutation));
        {
            let session = &self.inner.session;
            let mut state = self.inner.state.borrow_mut();
            match &mutation {
                Mutation::SetToken(token) => session.set_token(token),
                Mutation::SetUser(user) => session.set_user(user),
                Mutation::SetOrganizations(items) => state.organizations = items.clone(),
                Mutation::SetProjects(items) => state.projects = items.clone(),
                Mutation::SetProducts(items) => state.products = items.clone(),
                Mutation::SetUsers(items) => state.users = items.clone(),
                Mutation::SetRoles(items) => state.roles = items.clone(),
                Mutation::SetLogs(items) => state.logs = items.clone(),
                Mutation::SetObjectClasses(items) => state.object_classes = items.clone(),
                Mutation::ClearAuth => session.clear(),
                Mutation::PushNotice(notice) => state.notices.push(notice.clone()),
                Mutation::DismissNotices => state.notices.clear(),
            }
        }

        let listeners: Vec<Listener> = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(&mutation);
        }
    }

    // ---- read accessors ----

    pub fn session(&self) -> Session {
        self.inner.session.snapshot()
    }

    pub fn session_handle(&self) -> &SessionHandle {
        &self.inner.session
    }

    pub fn token(&self) -> Option<String> {
        self.inner.session.token()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.inner.session.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.session.is_authenticated()
    }

    pub fn state(&self) -> StoreState {
        self.inner.state.borrow().clone()
    }

    pub fn organizations(&self) -> Vec<Organization> {
        self.inner.state.borrow().organizations.clone()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.inner.state.borrow().projects.clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.inner.state.borrow().products.clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.inner.state.borrow().users.clone()
    }

    pub fn roles(&self) -> Vec<Role> {
        self.inner.state.borrow().roles.clone()
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.inner.state.borrow().logs.clone()
    }

    pub fn object_classes(&self) -> Vec<ObjectClass> {
        self.inner.state.borrow().object_classes.clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.inner.state.borrow().notices.clone()
    }

    // ---- actions ----

    /// Authenticate and persist the session.
    ///
    /// Errors are returned unchanged; the session is left untouched on
    /// failure.
    pub async fn login(&self, credentials: LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = auth_api::login(&self.inner.client, &credentials)
            .await
            .map_err(|e| {
                log::warn!("Login failed for '{}': {}", credentials.username, e);
                e
            })?;

        self.commit(Mutation::SetToken(response.token.clone()));
        self.commit(Mutation::SetUser(response.user.clone()));
        self.inner
            .client
            .set_default_header(AUTHORIZATION, bearer(&response.token));
        log::info!("Logged in as '{}'", response.user.username);
        Ok(response)
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let response = auth_api::register(&self.inner.client, &request).await?;
        log::info!("Registered user #{} '{}'", response.user_id, request.username);
        Ok(response)
    }

    pub fn logout(&self) {
        self.commit(Mutation::ClearAuth);
        self.inner.client.remove_default_header(AUTHORIZATION);
        log::info!("Logged out");
    }

    pub async fn fetch_organizations(&self) -> Result<Vec<Organization>, ApiError> {
        self.fetch(Mutation::SetOrganizations).await
    }

    pub async fn fetch_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.fetch(Mutation::SetProjects).await
    }

    pub async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        self.fetch(Mutation::SetProducts).await
    }

    pub async fn fetch_users(&self) -> Result<Vec<User>, ApiError> {
        self.fetch(Mutation::SetUsers).await
    }

    pub async fn fetch_roles(&self) -> Result<Vec<Role>, ApiError> {
        self.fetch(Mutation::SetRoles).await
    }

    pub async fn fetch_logs(&self) -> Result<Vec<LogEntry>, ApiError> {
        self.fetch(Mutation::SetLogs).await
    }

    pub async fn fetch_object_classes(&self) -> Result<Vec<ObjectClass>, ApiError> {
        self.fetch(Mutation::SetObjectClasses).await
    }

    /// Detail fetch; does not touch the caches
    pub async fn fetch_organization(&self, id: &str) -> Result<Organization, ApiError> {
        resources::fetch_one(&self.inner.client, id).await
    }

    pub async fn fetch_object_class(&self, id: &str) -> Result<ObjectClass, ApiError> {
        resources::fetch_one(&self.inner.client, id).await
    }

    async fn fetch<T: Resource>(
        &self,
        mutation: fn(Vec<T>) -> Mutation,
    ) -> Result<Vec<T>, ApiError> {
        let items = resources::fetch_all::<T>(&self.inner.client)
            .await
            .map_err(|e| {
                log::warn!("Failed to fetch {}: {}", T::LABEL, e);
                e
            })?;
        self.commit(mutation(items.clone()));
        Ok(items)
    }
}

fn mutation_name(mutation: &Mutation) -> &'static str {
    match mutation {
        Mutation::SetToken(_) => "SET_TOKEN",
        Mutation::SetUser(_) => "SET_USER",
        Mutation::SetOrganizations(_) => "SET_ORGANIZATIONS",
        Mutation::SetProjects(_) => "SET_PROJECTS",
        Mutation::SetProducts(_) => "SET_PRODUCTS",
        Mutation::SetUsers(_) => "SET_USERS",
        Mutation::SetRoles(_) => "SET_ROLES",
        Mutation::SetLogs(_) => "SET_LOGS",
        Mutation::SetObjectClasses(_) => "SET_OBJECT_CLASSES",
        Mutation::ClearAuth => "CLEAR_AUTH",
        Mutation::PushNotice(_) => "PUSH_NOTICE",
        Mutation::DismissNotices => "DISMISS_NOTICES",
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::shared::config::Config;
    use crate::shared::http::mock::MockTransport;
    use crate::shared::http::{BearerAuth, Method};
    use crate::system::auth::storage::{KeyValueStore, MemoryStorage};

    struct Fixture {
        storage: MemoryStorage,
        transport: MockTransport,
        store: SessionStore,
    }

    fn fixture(token: Option<&str>) -> Fixture {
        let storage = MemoryStorage::new();
        if let Some(token) = token {
            storage.set("token", token);
        }
        let session = SessionHandle::restore(Rc::new(storage.clone()), Config::default().storage);
        let transport = MockTransport::new();
        let client = ApiClient::new("http://localhost:8080/api", transport.handle())
            .with(BearerAuth::new(session.clone()));
        let store = SessionStore::new(session, client);
        Fixture {
            storage,
            transport,
            store,
        }
    }

    #[tokio::test]
    async fn test_fetch_users_replaces_cache() {
        let f = fixture(Some("abc"));
        f.transport.respond(Method::Get, "/users", 200, r#"[{"id":1}]"#);

        let users = f.store.fetch_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(
            f.store.users(),
            vec![User {
                id: 1,
                ..User::default()
            }]
        );

        let sent = &f.transport.requests()[0];
        assert_eq!(sent.url, "http://localhost:8080/api/users");
        assert_eq!(sent.header(AUTHORIZATION), Some("Bearer abc"));

        f.transport.respond(Method::Get, "/users", 200, r#"[{"id":2},{"id":3}]"#);
        f.store.fetch_users().await.unwrap();
        let ids: Vec<u64> = f.store.users().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_each_fetch_hits_its_endpoint() {
        let f = fixture(Some("abc"));
        for path in [
            "/organizations",
            "/projects",
            "/products",
            "/roles",
            "/logs",
            "/object-classes",
        ] {
            f.transport.respond(Method::Get, path, 200, r#"[{"id":5}]"#);
        }

        f.store.fetch_organizations().await.unwrap();
        f.store.fetch_projects().await.unwrap();
        f.store.fetch_products().await.unwrap();
        f.store.fetch_roles().await.unwrap();
        f.store.fetch_logs().await.unwrap();
        f.store.fetch_object_classes().await.unwrap();

        let state = f.store.state();
        assert_eq!(state.organizations[0].id, 5);
        assert_eq!(state.projects[0].id, 5);
        assert_eq!(state.products[0].id, 5);
        assert_eq!(state.roles[0].id, 5);
        assert_eq!(state.logs[0].id, 5);
        assert_eq!(state.object_classes[0].id, 5);
        assert!(state.users.is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_cache_and_propagates() {
        let f = fixture(Some("abc"));
        f.transport.respond(Method::Get, "/roles", 200, r#"[{"id":1}]"#);
        f.store.fetch_roles().await.unwrap();

        f.transport.respond(Method::Get, "/roles", 500, "db down");
        let err = f.store.fetch_roles().await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                body: "db down".into()
            }
        );
        assert_eq!(f.store.roles().len(), 1);
    }

    #[tokio::test]
    async fn test_login_persists_session_and_sets_default_header() {
        let f = fixture(None);
        f.transport.respond(
            Method::Post,
            "/auth/login",
            200,
            r#"{"token":"t-123","user":{"id":1,"username":"admin"}}"#,
        );

        let response = f
            .store
            .login(LoginRequest {
                username: "admin".into(),
                password: "admin".into(),
            })
            .await
            .unwrap();

        assert_eq!(response.token, "t-123");
        assert_eq!(f.store.token().as_deref(), Some("t-123"));
        assert_eq!(f.store.user().map(|u| u.username), Some("admin".to_string()));
        assert_eq!(f.storage.get("token").as_deref(), Some("t-123"));
        assert!(f.storage.get("user").is_some());
        assert_eq!(
            f.store.client().default_header(AUTHORIZATION).as_deref(),
            Some("Bearer t-123")
        );
    }

    #[tokio::test]
    async fn test_login_failure_leaves_session_empty() {
        let f = fixture(None);
        f.transport.respond(
            Method::Post,
            "/auth/login",
            400,
            r#"{"error":"bad request"}"#,
        );

        let err = f
            .store
            .login(LoginRequest {
                username: "admin".into(),
                password: "wrong".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 400, .. }));
        assert!(!f.store.is_authenticated());
        assert!(f.storage.get("token").is_none());
        assert!(f.store.client().default_header(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let f = fixture(Some("abc"));
        assert_eq!(
            f.store.client().default_header(AUTHORIZATION).as_deref(),
            Some("Bearer abc")
        );

        f.store.logout();

        assert!(f.store.token().is_none());
        assert!(f.store.user().is_none());
        assert!(f.storage.get("token").is_none());
        assert!(f.storage.get("user").is_none());
        assert!(f.store.client().default_header(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_register_does_not_log_in() {
        let f = fixture(None);
        f.transport.respond(
            Method::Post,
            "/auth/register",
            201,
            r#"{"message":"User registered successfully","user_id":9}"#,
        );

        let response = f
            .store
            .register(RegisterRequest {
                username: "op".into(),
                password: "secret".into(),
                email: "op@example.com".into(),
                full_name: "Operator".into(),
                phone: None,
            })
            .await
            .unwrap();

        assert_eq!(response.user_id, 9);
        assert!(!f.store.is_authenticated());
    }

    #[tokio::test]
    async fn test_detail_fetch_leaves_cache_alone() {
        let f = fixture(Some("abc"));
        f.transport
            .respond(Method::Get, "/organizations/3", 200, r#"{"id":3,"name":"HQ"}"#);

        let org = f.store.fetch_organization("3").await.unwrap();
        assert_eq!(org.name, "HQ");
        assert!(f.store.organizations().is_empty());
    }

    #[test]
    fn test_subscribers_see_each_commit() {
        let f = fixture(None);
        let seen = Rc::new(Cell::new(0));
        let counter = seen.clone();
        f.store.subscribe(move |_| counter.set(counter.get() + 1));

        f.store.commit(Mutation::PushNotice(Notice::SessionExpired));
        f.store.commit(Mutation::DismissNotices);

        assert_eq!(seen.get(), 2);
        assert!(f.store.notices().is_empty());
    }

    #[test]
    fn test_weak_handle_does_not_keep_store_alive() {
        let f = fixture(None);
        let weak = f.store.downgrade();
        assert!(weak.upgrade().is_some());
        drop(f);
        assert!(weak.upgrade().is_none());
    }
}
