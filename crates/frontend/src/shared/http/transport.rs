//! Transport seam between the API client and the network.
//!
//! Browser builds (wasm32) send through `gloo-net`, native builds through
//! `reqwest`. Tests plug in an in-memory transport instead.

use std::rc::Rc;

use async_trait::async_trait;

use super::{ApiError, ApiRequest, ApiResponse};

/// Sends a fully prepared request. Status codes are not interpreted here;
/// only failures to complete the exchange are errors.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

#[cfg(target_arch = "wasm32")]
pub fn default_transport() -> Rc<dyn Transport> {
    Rc::new(browser::FetchTransport)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_transport() -> Rc<dyn Transport> {
    Rc::new(native::ReqwestTransport::default())
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use async_trait::async_trait;
    use gloo_net::http::{Request, RequestBuilder};

    use super::super::{ApiError, ApiRequest, ApiResponse, Method};
    use super::Transport;

    pub struct FetchTransport;

    fn builder(request: &ApiRequest) -> RequestBuilder {
        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Delete => Request::delete(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        builder
    }

    #[async_trait(?Send)]
    impl Transport for FetchTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
            let builder = builder(&request);
            let response = match request.body {
                Some(body) => builder
                    .body(body)
                    .map_err(|e| ApiError::Encode(e.to_string()))?
                    .send()
                    .await,
                None => builder.send().await,
            }
            .map_err(|e| ApiError::Network(e.to_string()))?;

            let status = response.status();
            let headers = response.headers().entries().collect();
            let body = response
                .text()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            Ok(ApiResponse {
                status,
                headers,
                body,
            })
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use async_trait::async_trait;

    use super::super::{ApiError, ApiRequest, ApiResponse, Method};
    use super::Transport;

    #[derive(Default)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    #[async_trait(?Send)]
    impl Transport for ReqwestTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
            let mut builder = self.client.request(method(request.method), &request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    let value = value.to_str().ok()?;
                    Some((name.as_str().to_string(), value.to_string()))
                })
                .collect();
            let body = response
                .text()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            Ok(ApiResponse {
                status,
                headers,
                body,
            })
        }
    }
}
