//! CORS middleware for axum.
//!
//! Answers every `OPTIONS` request with `204 No Content` and attaches the
//! same three permissive headers to every other response.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware};
//!
//! let app = Router::new()
//!     .route("/api/analyze", any(handler))
//!     .layer(middleware::from_fn(cors_middleware));
//! ```

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Header name/value pairs attached to every response.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("access-control-allow-headers", "Content-Type"),
];

/// Inserts the CORS headers, replacing any existing values.
pub fn apply_cors_headers(headers: &mut HeaderMap) {
    for (name, value) in CORS_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}

/// CORS middleware: short-circuits preflight requests.
pub async fn cors_middleware(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };
    apply_cors_headers(response.headers_mut());
    response
}
