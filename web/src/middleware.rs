//! Request tracking middleware.
//!
//! Every request carries an `X-Correlation-ID`:
//!
//! 1. **Accept** the client's header when present, otherwise generate a UUID
//! 2. **Trace** the request in an `http_request` span tagged with the id
//! 3. **Echo** the id back on the response
//!
//! # Example
//!
//! ```ignore
//! use tabs_web::middleware::with_request_tracking;
//!
//! let app = with_request_tracking(Router::new().route("/health", get(health_check)));
//! ```

use axum::{Router, body::Body, http::HeaderName, http::Request};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Wrap `router` with correlation id and request tracing layers.
///
/// Layers run outermost first: the id is assigned before the trace span
/// opens, so the span always has one.
pub fn with_request_tracking<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let header = HeaderName::from_static(CORRELATION_ID_HEADER);

    router
        .layer(PropagateRequestIdLayer::new(header.clone()))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(SetRequestIdLayer::new(header, MakeRequestUuid))
}

fn request_span(request: &Request<Body>) -> Span {
    let correlation_id = request
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "http_request",
        correlation_id = %correlation_id,
        method = %request.method(),
        uri = %request.uri(),
    )
}
