//! wanderlust/crates/wl-api/src/middleware.rs Middleware
//!
//! Request rewriting, tracing, and panic containment.

use std::any::Any;

use axum::extract::{Query, Request};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tower_http::trace::{HttpMakeClassifier, TraceLayer};

use crate::error::ErrorPage;

// Returns the per-request tracing layer for the Wanderlust router.
pub fn standard_middleware() -> TraceLayer<HttpMakeClassifier> {
    TraceLayer::new_for_http()
}

#[derive(Deserialize)]
struct MethodOverride {
    #[serde(rename = "_method")]
    method: Option<String>,
}

/// Lets HTML forms reach PUT/PATCH/DELETE routes.
///
/// A `POST` whose query string carries `_method=PUT|PATCH|DELETE` is
/// dispatched as that method. Must wrap the router, since routing reads
/// the method.
pub fn method_override(mut req: Request) -> Request {
    if req.method() != Method::POST {
        return req;
    }
    let Ok(Query(MethodOverride { method: Some(method) })) = Query::<MethodOverride>::try_from_uri(req.uri()) else {
        return req;
    };

    let target = match method.to_ascii_uppercase().as_str() {
        "PUT" => Method::PUT,
        "PATCH" => Method::PATCH,
        "DELETE" => Method::DELETE,
        _ => return req,
    };
    *req.method_mut() = target;
    req
}

/// Response for a handler that panicked: the generic 500 page.
pub fn panic_page(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = detail, "handler panicked");

    ErrorPage::default().into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn post(uri: &str) -> Request {
        Request::builder().method(Method::POST).uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn post_with_override_changes_method() {
        assert_eq!(method_override(post("/listings/1?_method=PUT")).method(), Method::PUT);
        assert_eq!(method_override(post("/listings/1?_method=delete")).method(), Method::DELETE);
    }

    #[test]
    fn other_requests_are_untouched() {
        assert_eq!(method_override(post("/listings")).method(), Method::POST);
        assert_eq!(method_override(post("/listings?_method=GET")).method(), Method::POST);

        let get = Request::builder().uri("/listings?_method=DELETE").body(Body::empty()).unwrap();
        assert_eq!(method_override(get).method(), Method::GET);
    }
}
