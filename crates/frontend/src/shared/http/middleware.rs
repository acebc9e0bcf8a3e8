//! Middleware composed around [`ApiClient`](super::ApiClient).
//!
//! Each middleware has one job. Requests pass through the chain in
//! registration order, responses in reverse order.

use std::rc::Rc;

use super::{ApiRequest, ApiResponse, AUTHORIZATION, STATUS_UNAUTHORIZED};

pub trait Middleware {
    fn on_request(&self, _request: &mut ApiRequest) {}

    fn on_response(&self, _request: &ApiRequest, _response: &ApiResponse) {}
}

/// Anything that can report the current bearer token
pub trait TokenSource {
    /// Non-empty token, or `None` when not authenticated
    fn token(&self) -> Option<String>;
}

impl<F> TokenSource for F
where
    F: Fn() -> Option<String>,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Adds `Authorization: Bearer <token>` when a token is present.
///
/// The header is rewritten from the live token on every request, so a stale
/// default header can never outlive the session.
pub struct BearerAuth<S> {
    source: S,
}

impl<S: TokenSource> BearerAuth<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: TokenSource> Middleware for BearerAuth<S> {
    fn on_request(&self, request: &mut ApiRequest) {
        match self.source.token() {
            Some(token) => request.set_header(AUTHORIZATION, bearer(&token)),
            None => request.remove_header(AUTHORIZATION),
        }
    }
}

/// Reacts to 401 responses by running the session-expired callback
pub struct UnauthorizedHandler {
    on_unauthorized: Rc<dyn Fn()>,
}

impl UnauthorizedHandler {
    pub fn new(on_unauthorized: impl Fn() + 'static) -> Self {
        Self {
            on_unauthorized: Rc::new(on_unauthorized),
        }
    }
}

impl Middleware for UnauthorizedHandler {
    fn on_response(&self, request: &ApiRequest, response: &ApiResponse) {
        if response.status == STATUS_UNAUTHORIZED {
            log::warn!(
                "{} {} rejected with 401, session expired",
                request.method.as_str(),
                request.path
            );
            (self.on_unauthorized)();
        }
    }
}

pub struct RequestLogger;

impl Middleware for RequestLogger {
    fn on_request(&self, request: &mut ApiRequest) {
        log::debug!("-> {} {}", request.method.as_str(), request.path);
    }

    fn on_response(&self, request: &ApiRequest, response: &ApiResponse) {
        log::debug!(
            "<- {} {} {}",
            request.method.as_str(),
            request.path,
            response.status
        );
    }
}
