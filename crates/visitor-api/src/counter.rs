//! The counter operation and its HTTP adapter.
//!
//! `handle_request` is the whole service: one atomic add-and-read against the
//! store, mapped to a response envelope. Store failures are caught here and
//! become a 500 envelope; nothing is retried.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use visitor_core::envelope::{ApiResponse, Outcome};

use crate::app_state::AppState;
use crate::obs::CounterMetrics;
use crate::store::{CounterStore, RecordKey};

/// Increment the record by one and report the new value.
pub async fn handle_request(
    store: &dyn CounterStore,
    key: &RecordKey,
    metrics: &CounterMetrics,
) -> ApiResponse {
    let started = Instant::now();
    let result = store.add_and_get(key, 1).await;
    metrics
        .store_duration
        .observe(&[("backend", store.backend())], started.elapsed());

    let outcome = match result {
        Ok(count) => {
            metrics.observe_count(count);
            tracing::debug!(record = %key, count, "visit counted");
            Outcome::Success { count }
        }
        Err(e) => {
            tracing::warn!(record = %key, backend = store.backend(), kind = e.kind().as_str(), error = %e, "increment failed");
            Outcome::StoreFailure {
                message: e.to_string(),
            }
        }
    };

    metrics.requests.inc(&[("outcome", outcome.label())]);
    outcome.into_response()
}

/// `GET {route}`: the request carries nothing the service reads.
pub async fn visitors(State(app): State<AppState>) -> Response {
    let resp = handle_request(app.store().as_ref(), app.record_key(), app.metrics()).await;
    into_http(resp)
}

/// Convert the envelope into an axum response.
pub fn into_http(resp: ApiResponse) -> Response {
    let status = StatusCode::from_u16(resp.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut out = (status, Body::from(resp.body)).into_response();

    let headers = out.headers_mut();
    for (name, value) in &resp.headers {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(n), Ok(v)) => {
                headers.insert(n, v);
            }
            _ => tracing::warn!(header = %name, "dropping invalid response header"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use visitor_core::envelope::HEADER_ALLOW_ORIGIN;

    #[test]
    fn http_conversion_keeps_status_and_headers() {
        let resp = into_http(Outcome::Success { count: 3 }.into_response());
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[HEADER_ALLOW_ORIGIN], "*");
        assert_eq!(resp.headers()["content-type"], "application/json");
    }

    #[test]
    fn failure_maps_to_500() {
        let resp = into_http(
            Outcome::StoreFailure {
                message: "x".into(),
            }
            .into_response(),
        );
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
