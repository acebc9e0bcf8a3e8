use contracts::system::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use crate::shared::http::{ApiClient, ApiError};

pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const REGISTER_ENDPOINT: &str = "/auth/register";

/// Login with username and password
pub async fn login(client: &ApiClient, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
    client.post_json(LOGIN_ENDPOINT, request).await
}

/// Register a new account. Does not log in.
pub async fn register(
    client: &ApiClient,
    request: &RegisterRequest,
) -> Result<RegisterResponse, ApiError> {
    client.post_json(REGISTER_ENDPOINT, request).await
}
