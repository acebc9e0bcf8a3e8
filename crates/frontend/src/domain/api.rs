use super::Resource;
use crate::shared::api_utils::record_path;
use crate::shared::http::{ApiClient, ApiError};

/// Fetch the whole collection of `T`
pub async fn fetch_all<T: Resource>(client: &ApiClient) -> Result<Vec<T>, ApiError> {
    let items: Vec<T> = client.get_json(T::ENDPOINT).await?;
    log::debug!("Fetched {} {}", items.len(), T::LABEL);
    Ok(items)
}

/// Fetch a single record of `T` by id
pub async fn fetch_one<T: Resource>(client: &ApiClient, id: &str) -> Result<T, ApiError> {
    client.get_json(&record_path(T::ENDPOINT, id)).await
}
