//! Client-side navigation: resolves a target, follows redirects, and runs the
//! guard on every hop.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use super::guard::{Guard, GuardDecision};
use super::table::{normalize_path, RouteTable};
use crate::system::auth::session::SessionHandle;

#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub path: String,
    pub route_name: String,
    pub params: Vec<(String, String)>,
    /// Originally requested path when redirects were followed
    pub redirected_from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no route matches '{0}'")]
    NotFound(String),

    #[error("too many redirects navigating to '{0}'")]
    RedirectLoop(String),
}

type Listener = Rc<dyn Fn(&Navigation)>;

struct NavigatorInner {
    table: Rc<RouteTable>,
    guard: Guard,
    session: SessionHandle,
    max_redirects: usize,
    current: RefCell<Option<Navigation>>,
    history: RefCell<Vec<String>>,
    listeners: RefCell<Vec<Listener>>,
}

#[derive(Clone)]
pub struct Navigator {
    inner: Rc<NavigatorInner>,
}

impl Navigator {
    pub fn new(
        table: Rc<RouteTable>,
        guard: Guard,
        session: SessionHandle,
        max_redirects: usize,
    ) -> Self {
        Self {
            inner: Rc::new(NavigatorInner {
                table,
                guard,
                session,
                max_redirects,
                current: RefCell::new(None),
                history: RefCell::new(Vec::new()),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.inner.table
    }

    pub fn current(&self) -> Option<Navigation> {
        self.inner.current.borrow().clone()
    }

    pub fn current_path(&self) -> Option<String> {
        self.inner.current.borrow().as_ref().map(|n| n.path.clone())
    }

    pub fn history(&self) -> Vec<String> {
        self.inner.history.borrow().clone()
    }

    pub fn on_change(&self, listener: impl Fn(&Navigation) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn login_path(&self) -> &str {
        self.inner.guard.login_path()
    }

    pub fn push_login(&self) -> Result<Navigation, NavigationError> {
        let login = self.inner.guard.login_path().to_string();
        self.navigate(&login)
    }

    pub fn navigate(&self, path: &str) -> Result<Navigation, NavigationError> {
        let requested = normalize_path(path);
        let navigation = self.resolve(&requested)?;

        *self.inner.current.borrow_mut() = Some(navigation.clone());
        self.inner.history.borrow_mut().push(navigation.path.clone());
        match &navigation.redirected_from {
            Some(from) => log::debug!("navigate {} -> {}", from, navigation.path),
            None => log::debug!("navigate {}", navigation.path),
        }

        let listeners: Vec<Listener> = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(&navigation);
        }
        Ok(navigation)
    }

    fn resolve(&self, requested: &str) -> Result<Navigation, NavigationError> {
        let inner = &self.inner;
        let mut target = requested.to_string();

        for _ in 0..=inner.max_redirects {
            let matched = inner.table.resolve(&target);

            if let Some(to) = matched.as_ref().and_then(|m| m.route().redirect.clone()) {
                target = normalize_path(&to);
                continue;
            }

            let token = inner.session.token();
            match inner
                .guard
                .check_match(&target, matched.as_ref(), token.as_deref())
            {
                GuardDecision::RedirectToLogin => {
                    target = inner.guard.login_path().to_string();
                }
                GuardDecision::RedirectToHome => {
                    target = inner.guard.home_path().to_string();
                }
                GuardDecision::Allow => {
                    let matched = matched.ok_or_else(|| NavigationError::NotFound(target.clone()))?;
                    return Ok(Navigation {
                        route_name: matched.route().name.clone(),
                        params: matched.params.clone(),
                        redirected_from: (target != requested).then(|| requested.to_string()),
                        path: target,
                    });
                }
            }
        }

        log::warn!("Redirect loop while navigating to {}", requested);
        Err(NavigationError::RedirectLoop(requested.to_string()))
    }
}
