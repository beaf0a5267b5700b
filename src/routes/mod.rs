use std::future::Future;

use crate::db::QUERY_TIMEOUT;
use crate::error::ApiError;

pub mod health;
pub mod home;
pub mod location;
pub mod reader;

/// Runs one query future under the shared per-request timeout, so a stuck
/// database surfaces as 503 instead of an open-ended hang.
pub async fn timed<T, F>(fut: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(QUERY_TIMEOUT, fut).await {
        Ok(res) => res.map_err(ApiError::from),
        Err(_) => Err(ApiError::Timeout),
    }
}
