use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by a product store.
///
/// `Request` and `Status` only ever originate from the remote variant; the
/// fallback combinator consumes them and retries the operation locally, so
/// callers of the combined store observe them on no path. `NotFound` and
/// `Unexpected` can come out of the local variant and do propagate.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status: {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
