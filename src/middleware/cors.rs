//! CORS policy for the browser frontend.
//!
//! Note:
//! - CORS is enforced by browsers. Server-to-server calls (no `Origin`) are not restricted.
//! - Apply this as the outermost layer so neither preflights nor foreign origins ever
//!   reach the auth gate.
//!
//! Policy:
//! - Allowlist origins from Config (exact match), WITH credentials.
//! - A request carrying an `Origin` outside the allowlist is refused with a bare 403
//!   before any authority call is made. Requests without `Origin` pass through.
//! - Wildcard origins are refused by `Config` since credentials are allowed.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, Method, Request, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;
use crate::error::AppError;

type AllowedOrigins = Arc<[HeaderValue]>;

/// Apply CORS policy to the given Router.
pub fn apply(router: Router, config: &Config) -> Router {
    with_origins(router, &config.cors_allowed_origins)
}

fn with_origins(router: Router, origins: &[String]) -> Router {
    let allowed = allowed_origins(origins);

    router
        .layer(layer(allowed.clone()))
        .layer(middleware::from_fn_with_state(allowed, origin_guard))
}

fn allowed_origins(origins: &[String]) -> AllowedOrigins {
    // An empty allowlist means only origin-less requests get through, never "allow everything".
    origins
        .iter()
        .filter_map(|s| match HeaderValue::from_str(s) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %s, "ignoring unusable CORS origin");
                None
            }
        })
        .collect()
}

async fn origin_guard(
    State(allowed): State<AllowedOrigins>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(origin) = req.headers().get(header::ORIGIN)
        && !allowed.iter().any(|v| v == origin)
    {
        tracing::debug!(origin = ?origin, path = %req.uri().path(), "origin not allowed");
        return Err(AppError::ForbiddenOrigin);
    }

    Ok(next.run(req).await)
}

fn layer(allowed: AllowedOrigins) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed.iter().cloned()))
        .allow_methods([
            Method::PUT,
            Method::PATCH,
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 10))
}
