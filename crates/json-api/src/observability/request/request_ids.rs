//! Request ID resolution and response header helpers.

use salvo::{
    http::{StatusCode, header::HeaderValue},
    prelude::Response,
};
use tracing::warn;
use uuid::Uuid;

pub(super) const REQUEST_ID_HEADER: &str = "x-request-id";

/// Incoming request id, or a fresh v7 UUID when missing or blank.
pub(super) fn resolve_request_id(header_value: Option<String>) -> String {
    header_value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}

pub(super) fn set_request_id_header(res: &mut Response, request_id: &str) {
    match HeaderValue::from_str(request_id) {
        Ok(value) => {
            res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(source) => {
            warn!(
                request_id,
                "could not encode request id for response header: {source}"
            );
        }
    }
}

pub(super) fn response_status_or_ok(status_code: Option<StatusCode>) -> StatusCode {
    status_code.unwrap_or(StatusCode::OK)
}
