//! In-memory transport for tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;

use super::{ApiError, ApiRequest, ApiResponse, Method, Transport};

#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    routes: Rc<RefCell<HashMap<(&'static str, String), ApiResponse>>>,
    requests: Rc<RefCell<Vec<ApiRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> Rc<dyn Transport> {
        Rc::new(self.clone())
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: &str) {
        self.routes.borrow_mut().insert(
            (method.as_str(), path.to_string()),
            ApiResponse::new(status, body),
        );
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        self.routes
            .borrow()
            .get(&(request.method.as_str(), request.path.clone()))
            .cloned()
            .ok_or_else(|| ApiError::Network(format!("connection refused: {}", request.url)))
    }
}
