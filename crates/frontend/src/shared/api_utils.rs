//! API utilities for frontend-backend communication
//!
//! Helpers for turning the configured base URL and endpoint paths into
//! request URLs.

/// Resolve the configured API base against the page origin
///
/// Absolute bases (`http://...`) are used as is. A relative base such as
/// `/api` is prefixed with the current window origin so that the dev proxy
/// setup keeps working.
///
/// # Example
/// ```rust,ignore
/// let base = api_base("/api"); // "http://localhost:8081/api" in the browser
/// ```
pub fn api_base(configured: &str) -> String {
    let configured = configured.trim_end_matches('/');
    if configured.contains("://") {
        return configured.to_string();
    }
    format!("{}{}", window_origin(), configured)
}

#[cfg(target_arch = "wasm32")]
fn window_origin() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    window.location().origin().unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn window_origin() -> String {
    String::new()
}

/// Join a base URL and an endpoint path with exactly one `/` between them
pub fn join_url(base: &str, path: &str) -> String {
    if path.contains("://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base, path)
}

/// Build an endpoint for a single record, e.g. `/organizations/42`
pub fn record_path(collection: &str, id: &str) -> String {
    format!(
        "{}/{}",
        collection.trim_end_matches('/'),
        urlencoding::encode(id)
    )
}
