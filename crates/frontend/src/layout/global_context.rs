use std::rc::Rc;

use thiserror::Error;

use crate::routes::guard::Guard;
use crate::routes::navigator::Navigator;
use crate::routes::routes::app_routes;
use crate::routes::table::{RouteTable, RouteTableError};
use crate::shared::api_utils::api_base;
use crate::shared::config::{load_config, Config, ConfigError, RoutesConfig};
use crate::shared::http::{
    default_transport, ApiClient, BearerAuth, RequestLogger, Transport, UnauthorizedHandler,
};
use crate::system::auth::session::SessionHandle;
use crate::system::auth::storage::{default_storage, KeyValueStore};
use crate::system::store::{Mutation, Notice, SessionStore};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid route table: {0}")]
    Routes(#[from] RouteTableError),

    #[error("routes.{field} = '{path}' {problem}")]
    EntryRoute {
        field: &'static str,
        path: String,
        problem: &'static str,
    },
}

/// The login page must exist and be public; home must exist
fn check_entry_routes(table: &RouteTable, routes: &RoutesConfig) -> Result<(), StartupError> {
    let entry_error = |field: &'static str, path: &str, problem: &'static str| {
        StartupError::EntryRoute {
            field,
            path: path.to_string(),
            problem,
        }
    };

    match table.resolve(&routes.login) {
        None => return Err(entry_error("login", &routes.login, "matches no route")),
        Some(m) if m.requires_auth() => {
            return Err(entry_error("login", &routes.login, "requires authentication"))
        }
        Some(m) if m.route().redirect.is_some() => {
            return Err(entry_error("login", &routes.login, "is a redirect"))
        }
        Some(_) => {}
    }
    if table.resolve(&routes.home).is_none() {
        return Err(entry_error("home", &routes.home, "matches no route"));
    }
    Ok(())
}

/// Application-wide state, created once at startup and handed to the UI
/// through context.
#[derive(Clone)]
pub struct AppGlobalContext {
    pub config: Rc<Config>,
    pub store: SessionStore,
    pub navigator: Navigator,
}

impl AppGlobalContext {
    /// Wire up the app with the platform storage and transport
    pub fn from_environment() -> Result<Self, StartupError> {
        let config = load_config()?;
        Self::new(config, default_storage(), default_transport())
    }

    pub fn new(
        config: Config,
        storage: Rc<dyn KeyValueStore>,
        transport: Rc<dyn Transport>,
    ) -> Result<Self, StartupError> {
        let table = Rc::new(RouteTable::new(app_routes())?);
        check_entry_routes(&table, &config.routes)?;
        let session = SessionHandle::restore(storage, config.storage.clone());
        let navigator = Navigator::new(
            table,
            Guard::new(&config.routes.login, &config.routes.home),
            session.clone(),
            config.routes.max_redirects,
        );

        let base_url = api_base(&config.api.base_url);
        let store = SessionStore::new_cyclic(session.clone(), |weak_store| {
            let navigator = navigator.clone();
            ApiClient::new(base_url, transport)
                .with(RequestLogger)
                .with(BearerAuth::new(session))
                .with(UnauthorizedHandler::new(move || {
                    if let Some(store) = weak_store.upgrade() {
                        let had_session = store.is_authenticated();
                        store.logout();
                        if had_session {
                            store.commit(Mutation::PushNotice(Notice::SessionExpired));
                        }
                    }
                    if navigator.current_path().as_deref() == Some(navigator.login_path()) {
                        return;
                    }
                    if let Err(e) = navigator.push_login() {
                        log::error!("Failed to navigate to login: {}", e);
                    }
                }))
        });

        Ok(Self {
            config: Rc::new(config),
            store,
            navigator,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use contracts::system::auth::LoginRequest;

    use super::*;
    use crate::shared::http::mock::MockTransport;
    use crate::shared::http::{ApiError, Method, AUTHORIZATION};
    use crate::system::auth::storage::MemoryStorage;

    fn context(token: Option<&str>) -> (AppGlobalContext, MemoryStorage, MockTransport) {
        let storage = MemoryStorage::new();
        if let Some(token) = token {
            storage.set("token", token);
        }
        let transport = MockTransport::new();
        let ctx = AppGlobalContext::new(
            Config::default(),
            Rc::new(storage.clone()),
            transport.handle(),
        )
        .unwrap();
        (ctx, storage, transport)
    }

    fn startup_with_routes(login: &str, home: &str) -> Result<AppGlobalContext, StartupError> {
        let mut config = Config::default();
        config.routes.login = login.to_string();
        config.routes.home = home.to_string();
        AppGlobalContext::new(
            config,
            Rc::new(MemoryStorage::new()),
            MockTransport::new().handle(),
        )
    }

    #[test]
    fn test_startup_rejects_unknown_login_route() {
        let err = startup_with_routes("/signin", "/").err().unwrap();
        assert!(matches!(
            err,
            StartupError::EntryRoute { field: "login", .. }
        ));
    }

    #[test]
    fn test_startup_rejects_protected_login_route() {
        let err = startup_with_routes("/users", "/").err().unwrap();
        assert!(matches!(
            err,
            StartupError::EntryRoute {
                field: "login",
                problem: "requires authentication",
                ..
            }
        ));
    }

    #[test]
    fn test_startup_rejects_unknown_home_route() {
        let err = startup_with_routes("/login", "/start").err().unwrap();
        assert!(matches!(err, StartupError::EntryRoute { field: "home", .. }));
    }

    #[test]
    fn test_startup_accepts_other_declared_home() {
        let ctx = startup_with_routes("/login", "/projects").unwrap();
        assert_eq!(ctx.navigator.navigate("/users").unwrap().path, "/login");
    }

    #[tokio::test]
    async fn test_rejected_login_stays_quietly_on_login() {
        let (ctx, _, transport) = context(None);
        transport.respond(Method::Post, "/auth/login", 401, r#"{"error":"bad credentials"}"#);
        assert_eq!(ctx.navigator.navigate("/login").unwrap().path, "/login");

        let err = ctx
            .store
            .login(LoginRequest {
                username: "admin".into(),
                password: "wrong".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::Unauthorized);
        assert!(ctx.store.notices().is_empty());
        assert_eq!(ctx.navigator.history(), vec!["/login"]);
    }

    #[tokio::test]
    async fn test_unauthorized_response_logs_out_and_returns_to_login() {
        let (ctx, storage, transport) = context(Some("abc"));
        transport.respond(Method::Get, "/projects", 401, r#"{"error":"expired"}"#);
        assert_eq!(ctx.navigator.navigate("/projects").unwrap().path, "/projects");

        let logouts = Rc::new(Cell::new(0));
        let counter = logouts.clone();
        ctx.store.subscribe(move |m| {
            if *m == Mutation::ClearAuth {
                counter.set(counter.get() + 1);
            }
        });

        let err = ctx.store.fetch_projects().await.unwrap_err();

        assert_eq!(err, ApiError::Unauthorized);
        assert_eq!(logouts.get(), 1);
        assert!(ctx.store.token().is_none());
        assert!(storage.get("token").is_none());
        assert!(ctx.store.client().default_header(AUTHORIZATION).is_none());
        assert_eq!(ctx.navigator.current_path().as_deref(), Some("/login"));
        assert_eq!(ctx.store.notices(), vec![Notice::SessionExpired]);
    }

    #[tokio::test]
    async fn test_requests_carry_token_only_when_present() {
        let (ctx, _, transport) = context(None);
        transport.respond(Method::Get, "/logs", 200, "[]");
        transport.respond(
            Method::Post,
            "/auth/login",
            200,
            r#"{"token":"fresh","user":{"id":1,"username":"admin"}}"#,
        );

        ctx.store.fetch_logs().await.unwrap();
        ctx.store
            .login(LoginRequest {
                username: "admin".into(),
                password: "admin".into(),
            })
            .await
            .unwrap();
        ctx.store.fetch_logs().await.unwrap();
        ctx.store.logout();
        ctx.store.fetch_logs().await.unwrap();

        let headers: Vec<Option<String>> = transport
            .requests()
            .iter()
            .filter(|r| r.path == "/logs")
            .map(|r| r.header(AUTHORIZATION).map(str::to_string))
            .collect();
        assert_eq!(
            headers,
            vec![None, Some("Bearer fresh".to_string()), None]
        );
    }

    #[tokio::test]
    async fn test_login_then_navigation_is_allowed() {
        let (ctx, _, transport) = context(None);
        assert_eq!(ctx.navigator.navigate("/users").unwrap().path, "/login");

        transport.respond(
            Method::Post,
            "/auth/login",
            200,
            r#"{"token":"abc","user":{"id":1,"username":"admin"}}"#,
        );
        ctx.store
            .login(LoginRequest {
                username: "admin".into(),
                password: "admin".into(),
            })
            .await
            .unwrap();

        assert_eq!(ctx.navigator.navigate("/users").unwrap().path, "/users");
        assert_eq!(ctx.navigator.navigate("/login").unwrap().path, "/");
    }

    #[test]
    fn test_persisted_token_restores_default_header() {
        let (ctx, _, _) = context(Some("abc"));
        assert!(ctx.store.is_authenticated());
        assert_eq!(
            ctx.store.client().default_header(AUTHORIZATION).as_deref(),
            Some("Bearer abc")
        );
    }
}
