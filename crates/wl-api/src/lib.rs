//! # wl-api
//!
//! The web routing and orchestration layer for Wanderlust.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;

use std::path::Path;

use axum::extract::Request;
use axum::handler::HandlerWithoutStateExt;
use axum::routing::{delete, get, post};
use axum::Router;
use tower::util::{MapRequest, MapRequestLayer};
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

pub use handlers::AppState;

/// The complete service: router wrapped in the method-override rewrite.
pub type App = MapRequest<Router, fn(Request) -> Request>;

/// Configures the routes for the listing directory.
///
/// Requests that match no route are looked up in `public_dir`; anything
/// still unanswered (including a known path with an unsupported method)
/// gets the 404 page.
pub fn configure_routes(state: AppState, public_dir: impl AsRef<Path>) -> Router {
    let assets = ServeDir::new(public_dir)
        .not_found_service(handlers::not_found.into_service())
        .call_fallback_on_method_not_allowed(true);

    Router::new()
        .route("/", get(handlers::root))
        .route("/listings", get(handlers::index).post(handlers::create))
        .route("/listings/new", get(handlers::new_form))
        .route(
            "/listings/{id}",
            get(handlers::show).put(handlers::update).delete(handlers::destroy),
        )
        .route("/listings/{id}/edit", get(handlers::edit))
        .route("/listings/{id}/reviews", post(handlers::create_review))
        .route("/listings/{id}/reviews/{review_id}", delete(handlers::destroy_review))
        .method_not_allowed_fallback(handlers::not_found)
        .fallback_service(assets)
        .layer(CatchPanicLayer::custom(middleware::panic_page))
        .layer(CompressionLayer::new())
        .layer(middleware::standard_middleware())
        .with_state(state)
}

/// Builds the service the binary serves and tests drive.
pub fn app(state: AppState, public_dir: impl AsRef<Path>) -> App {
    let rewrite: fn(Request) -> Request = middleware::method_override;
    MapRequestLayer::new(rewrite).layer(configure_routes(state, public_dir))
}
