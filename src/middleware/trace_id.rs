use axum::{
    body::Body,
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// HTTP header carrying the per-request trace id
pub const TRACE_ID_HEADER: &str = "x-trace-id";

const GENERATED_LEN: usize = 8;
const MAX_INCOMING_LEN: usize = 64;

/// Short correlation id stored in request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceId(String);

impl TraceId {
    /// Creates a new random 8-character id
    pub fn new() -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(GENERATED_LEN);
        Self(id)
    }

    /// Accepts a caller-supplied id if it is short printable ASCII
    pub fn parse(value: &str) -> Option<Self> {
        let valid = !value.is_empty()
            && value.len() <= MAX_INCOMING_LEN
            && value.bytes().all(|b| b.is_ascii_graphic());
        valid.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reuses the caller's `x-trace-id` when valid, otherwise generates one.
/// The id is put in request extensions and echoed on the response.
pub async fn trace_id_middleware(mut request: Request, next: Next) -> Response {
    let trace_id = request
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(TraceId::parse)
        .unwrap_or_else(TraceId::new);

    request.extensions_mut().insert(trace_id.clone());

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(trace_id.as_str()) {
        response.headers_mut().insert(TRACE_ID_HEADER, header_value);
    }

    response
}

/// Request span tagged with the trace id
pub fn make_span_with_trace_id(request: &Request<Body>) -> tracing::Span {
    let trace_id = request
        .extensions()
        .get::<TraceId>()
        .map(|id| id.as_str())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        trace_id = %trace_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_short_and_distinct() {
        let a = TraceId::new();
        let b = TraceId::new();
        assert_eq!(a.as_str().len(), 8);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_accepts_printable_ascii() {
        assert_eq!(TraceId::parse("req-42").unwrap().as_str(), "req-42");
        assert!(TraceId::parse(&"x".repeat(64)).is_some());
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(TraceId::parse("").is_none());
        assert!(TraceId::parse("has space").is_none());
        assert!(TraceId::parse("naïve").is_none());
        assert!(TraceId::parse(&"x".repeat(65)).is_none());
    }
}
