//! Navigation guard run before every route change.

use super::table::{normalize_path, RouteMatch, RouteTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
    RedirectToHome,
}

#[derive(Debug, Clone)]
pub struct Guard {
    login_path: String,
    home_path: String,
}

impl Guard {
    pub fn new(login_path: &str, home_path: &str) -> Self {
        Self {
            login_path: normalize_path(login_path),
            home_path: normalize_path(home_path),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn home_path(&self) -> &str {
        &self.home_path
    }

    /// Decide on a navigation to `target` given the current token.
    ///
    /// The token is read per call; nothing about a previous decision is
    /// remembered.
    pub fn check(&self, table: &RouteTable, target: &str, token: Option<&str>) -> GuardDecision {
        let target = normalize_path(target);
        let matched = table.resolve(&target);
        self.check_match(&target, matched.as_ref(), token)
    }

    /// Same as [`Guard::check`] for an already resolved target.
    ///
    /// An unmatched target is treated as protected.
    pub fn check_match(
        &self,
        target: &str,
        matched: Option<&RouteMatch<'_>>,
        token: Option<&str>,
    ) -> GuardDecision {
        let authenticated = token.is_some_and(|t| !t.is_empty());

        if target == self.login_path && authenticated {
            return GuardDecision::RedirectToHome;
        }

        let protected = matched.map_or(true, |m| m.requires_auth());
        if protected && !authenticated {
            return GuardDecision::RedirectToLogin;
        }

        GuardDecision::Allow
    }
}
