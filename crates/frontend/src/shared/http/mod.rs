//! HTTP plumbing: request/response values, the transport seam, and the
//! middleware chain composed around it.

pub mod client;
pub mod error;
pub mod middleware;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use client::ApiClient;
pub use error::ApiError;
pub use middleware::{BearerAuth, Middleware, RequestLogger, UnauthorizedHandler};
pub use transport::{default_transport, Transport};

pub const AUTHORIZATION: &str = "Authorization";
pub const STATUS_UNAUTHORIZED: u16 = 401;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Outgoing request; `url` is absolute once the client has resolved it
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            url: String::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Replace (case-insensitively) or append a header
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name.to_string(), value)),
        }
    }

    pub fn remove_header(&mut self, name: &str) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut request = ApiRequest::new(Method::Get, "/users");
        request.set_header("authorization", "Bearer a");
        request.set_header(AUTHORIZATION, "Bearer b");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header("AUTHORIZATION"), Some("Bearer b"));
        request.remove_header(AUTHORIZATION);
        assert!(request.header(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_response_ok_range() {
        assert!(ApiResponse::new(200, "").ok());
        assert!(ApiResponse::new(204, "").ok());
        assert!(!ApiResponse::new(401, "").ok());
        assert!(!ApiResponse::new(500, "").ok());
    }

    #[test]
    fn test_response_header_lookup() {
        let mut response = ApiResponse::new(200, "[]");
        response
            .headers
            .push(("content-type".into(), "application/json".into()));
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert!(response.header(AUTHORIZATION).is_none());
    }
}
