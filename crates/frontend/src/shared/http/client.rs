use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{
    ApiError, ApiRequest, ApiResponse, Method, Middleware, Transport, STATUS_UNAUTHORIZED,
};
use crate::shared::api_utils::join_url;

/// REST client shared by the session store and pages.
///
/// Cloning is cheap; clones share default headers and the middleware chain
/// registered before cloning.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Rc<dyn Transport>,
    middleware: Vec<Rc<dyn Middleware>>,
    default_headers: Rc<RefCell<Vec<(String, String)>>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Rc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            middleware: Vec::new(),
            default_headers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Append a middleware to the chain
    pub fn with(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Rc::new(middleware));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_default_header(&self, name: &str, value: impl Into<String>) {
        let value = value.into();
        let mut headers = self.default_headers.borrow_mut();
        match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(entry) => entry.1 = value,
            None => headers.push((name.to_string(), value)),
        }
    }

    pub fn remove_default_header(&self, name: &str) {
        self.default_headers
            .borrow_mut()
            .retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }

    pub fn default_header(&self, name: &str) -> Option<String> {
        self.default_headers
            .borrow()
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }

    /// Run the request through defaults, middleware and transport.
    ///
    /// Any HTTP status is returned as a response; only transport failures
    /// are errors at this level.
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        request.url = join_url(&self.base_url, &request.path);
        for (name, value) in self.default_headers.borrow().iter() {
            if request.header(name).is_none() {
                request.headers.push((name.clone(), value.clone()));
            }
        }
        for middleware in &self.middleware {
            middleware.on_request(&mut request);
        }

        let response = self.transport.send(request.clone()).await?;

        for middleware in self.middleware.iter().rev() {
            middleware.on_response(&request, &response);
        }
        Ok(response)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(ApiRequest::new(Method::Get, path)).await?;
        decode(response)
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        let mut request = ApiRequest::new(Method::Post, path);
        request.set_header("Content-Type", "application/json");
        request.body = Some(payload);

        let response = self.send(request).await?;
        decode(response)
    }
}

fn decode<T: DeserializeOwned>(response: ApiResponse) -> Result<T, ApiError> {
    if response.status == STATUS_UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if !response.ok() {
        return Err(ApiError::Status {
            status: response.status,
            body: response.body,
        });
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use serde_json::Value;

    use super::super::mock::MockTransport;
    use super::super::{BearerAuth, UnauthorizedHandler, AUTHORIZATION};
    use super::*;

    fn client(transport: &MockTransport) -> ApiClient {
        ApiClient::new("http://localhost:8080/api", transport.handle())
    }

    #[tokio::test]
    async fn test_get_json_resolves_url_and_decodes() {
        let transport = MockTransport::new();
        transport.respond(Method::Get, "/roles", 200, r#"[{"id":1,"name":"admin"}]"#);

        let roles: Value = client(&transport).get_json("/roles").await.unwrap();
        assert_eq!(roles[0]["name"], "admin");
        assert_eq!(
            transport.requests()[0].url,
            "http://localhost:8080/api/roles"
        );
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let transport = MockTransport::new();
        transport.respond(Method::Get, "/logs", 500, "boom");
        transport.respond(Method::Get, "/users", 401, "");
        transport.respond(Method::Get, "/projects", 200, "not json");
        let client = client(&transport);

        let err = client.get_json::<Value>("/logs").await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                body: "boom".into()
            }
        );
        let err = client.get_json::<Value>("/users").await.unwrap_err();
        assert!(err.is_unauthorized());
        let err = client.get_json::<Value>("/projects").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let transport = MockTransport::new();
        let err = client(&transport)
            .get_json::<Value>("/unknown")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[tokio::test]
    async fn test_default_headers_are_shared_between_clones() {
        let transport = MockTransport::new();
        transport.respond(Method::Get, "/products", 200, "[]");
        let client = client(&transport);
        let clone = client.clone();

        client.set_default_header(AUTHORIZATION, "Bearer abc");
        let _: Value = clone.get_json("/products").await.unwrap();
        assert_eq!(
            transport.requests()[0].header(AUTHORIZATION),
            Some("Bearer abc")
        );

        client.remove_default_header(AUTHORIZATION);
        assert!(clone.default_header(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_middleware_sees_request_and_response() {
        let transport = MockTransport::new();
        transport.respond(Method::Get, "/organizations", 401, "");
        let expired = Rc::new(Cell::new(0));
        let counter = expired.clone();
        let client = client(&transport)
            .with(BearerAuth::new(|| Some("abc".to_string())))
            .with(UnauthorizedHandler::new(move || counter.set(counter.get() + 1)));

        let err = client.get_json::<Value>("/organizations").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(expired.get(), 1);
        assert_eq!(
            transport.requests()[0].header(AUTHORIZATION),
            Some("Bearer abc")
        );
    }

    #[tokio::test]
    async fn test_post_json_sends_body() {
        let transport = MockTransport::new();
        transport.respond(Method::Post, "/auth/login", 200, r#"{"ok":true}"#);
        let body = serde_json::json!({ "username": "admin" });

        let reply: Value = client(&transport)
            .post_json("/auth/login", &body)
            .await
            .unwrap();
        assert_eq!(reply["ok"], true);

        let sent = &transport.requests()[0];
        assert_eq!(sent.header("content-type"), Some("application/json"));
        assert_eq!(sent.body.as_deref(), Some(r#"{"username":"admin"}"#));
    }
}
