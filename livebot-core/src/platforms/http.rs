// File: livebot-core/src/platforms/http.rs
//
// Shared response handling for every outbound HTTP call. Transport failures
// and non-success statuses become `Error::Api`; a body that does not decode
// is `Error::Json`.

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use livebot_common::error::ApiError;

use crate::Error;

/// Longest slice of an error body kept in the `ApiError` message.
const MAX_ERROR_BODY: usize = 200;

pub(crate) async fn send_json<T: DeserializeOwned>(req: RequestBuilder, url: &str) -> Result<T, Error> {
    let resp = req.send().await.map_err(|e| ApiError::transport(url, e.without_url()))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(status_error(url, status, resp).await);
    }

    let body = resp.text().await.map_err(|e| ApiError::transport(url, e.without_url()))?;
    debug!("{} => HTTP {} ({} bytes)", url, status, body.len());
    Ok(serde_json::from_str(&body)?)
}

/// For endpoints whose body we do not need. Statuses listed in `accept`
/// count as success alongside 2xx.
pub(crate) async fn send_expect_status(
    req: RequestBuilder,
    url: &str,
    accept: &[StatusCode],
) -> Result<StatusCode, Error> {
    let resp = req.send().await.map_err(|e| ApiError::transport(url, e.without_url()))?;
    let status = resp.status();
    if status.is_success() || accept.contains(&status) {
        debug!("{} => HTTP {}", url, status);
        return Ok(status);
    }
    Err(status_error(url, status, resp).await)
}

async fn status_error(url: &str, status: StatusCode, resp: reqwest::Response) -> Error {
    let body = resp.text().await.unwrap_or_default();
    warn!("{} => HTTP {}: {}", url, status, body);
    let mut err = ApiError::status(url, status.as_u16());
    if !body.is_empty() {
        err.message = Some(body.chars().take(MAX_ERROR_BODY).collect());
    }
    Error::Api(err)
}
