//! Header handling for forwarded requests
//!
//! Client headers are forwarded to the backend as-is, minus the framing
//! headers the outbound transport recomputes. `Authorization` passes through.

use axum::http::header::{self, HeaderMap, HeaderName};

/// Headers recomputed by the outbound transport
const RECOMPUTED_HEADERS: &[HeaderName] = &[header::HOST, header::CONTENT_LENGTH];

/// Hop-by-hop headers that must never be forwarded
const HOP_BY_HOP_HEADERS: &[HeaderName] = &[
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Check if a header is a hop-by-hop header that should not be forwarded
pub fn is_hop_by_hop_header(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(name) || name.as_str() == "keep-alive"
}

/// Copy inbound headers for the outbound request
pub fn build_forward_headers(incoming: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(incoming.len());

    for (name, value) in incoming {
        if RECOMPUTED_HEADERS.contains(name) || is_hop_by_hop_header(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    headers
}
