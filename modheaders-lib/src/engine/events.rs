use serde::{Deserialize, Serialize};

use crate::engine::RewriteContext;
use crate::rewriter::{Header, Phase};

/// Payload of an outgoing-request interception
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetails {
    pub url: String,
    #[serde(default)]
    pub request_headers: Vec<Header>,
}

/// Payload of an incoming-response interception
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDetails {
    pub url: String,
    #[serde(default)]
    pub response_headers: Vec<Header>,
}

/// Replaces the request headers of the intercepted event
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RequestHeadersResult {
    pub request_headers: Vec<Header>,
}

/// Replaces the response headers of the intercepted event
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseHeadersResult {
    pub response_headers: Vec<Header>,
}

/// Listener for outgoing requests
pub fn rewrite_request_headers(
    context: &RewriteContext,
    details: RequestDetails,
) -> RequestHeadersResult {
    let RequestDetails { url, request_headers: mut headers } = details;
    context.apply(&mut headers, &url, Phase::Request);
    RequestHeadersResult { request_headers: headers }
}

/// Listener for received responses
pub fn rewrite_response_headers(
    context: &RewriteContext,
    details: ResponseDetails,
) -> ResponseHeadersResult {
    let ResponseDetails { url, response_headers: mut headers } = details;
    context.apply(&mut headers, &url, Phase::Response);
    ResponseHeadersResult { response_headers: headers }
}
