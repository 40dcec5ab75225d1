//! # wl-api Handlers
//!
//! This module coordinates the flow between HTTP requests and Core traits.
//! Each handler does at most one storage round trip, then renders a view or
//! redirects. Failures propagate with `?` to the error page.

use std::sync::Arc;

use askama::Template;
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use uuid::Uuid;
use wl_core::error::AppError;
use wl_core::models::{Listing, Review, ReviewRemoval};
use wl_core::traits::ListingRepo;
use wl_core::validation::{ListingForm, ReviewForm};
use wl_ui::{EditTemplate, IndexTemplate, NewListingTemplate, ShowTemplate};

use crate::error::{ErrorPage, WebResult};
use crate::extract::Validated;

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn ListingRepo>,
}

impl AppState {
    pub fn new(repo: Arc<dyn ListingRepo>) -> Self {
        Self { repo }
    }
}

fn render(template: impl Template) -> WebResult<Html<String>> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(e.into()).into())
}

fn parse_id(entity: &'static str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::MalformedId(entity, raw.to_string()))
}

fn listing_not_found(id: Uuid) -> AppError {
    AppError::NotFound("Listing", id.to_string())
}

fn show_path(id: Uuid) -> String {
    format!("/listings/{id}")
}

/// Liveness answer for "/".
pub async fn root() -> &'static str {
    "Good."
}

/// Anything no route (or static file) answers for.
pub async fn not_found() -> ErrorPage {
    AppError::PageNotFound.into()
}

/// GET /listings
pub async fn index(State(state): State<AppState>) -> WebResult<Html<String>> {
    let listings = state.repo.list_listings().await?;
    render(IndexTemplate { listings: &listings })
}

/// GET /listings/new
pub async fn new_form() -> WebResult<Html<String>> {
    render(NewListingTemplate)
}

/// GET /listings/{id}
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> WebResult<Html<String>> {
    let id = parse_id("listing", &id)?;
    let (listing, reviews) = state
        .repo
        .get_listing_with_reviews(id)
        .await?
        .ok_or_else(|| listing_not_found(id))?;

    render(ShowTemplate { listing: &listing, reviews: &reviews })
}

/// POST /listings
pub async fn create(
    State(state): State<AppState>,
    Validated(draft): Validated<ListingForm>,
) -> WebResult<Redirect> {
    let listing = Listing::new(draft);
    let id = listing.id;
    state.repo.create_listing(listing).await?;

    tracing::info!(listing_id = %id, "listing created");
    Ok(Redirect::to("/listings"))
}

/// GET /listings/{id}/edit
pub async fn edit(State(state): State<AppState>, Path(id): Path<String>) -> WebResult<Html<String>> {
    let id = parse_id("listing", &id)?;
    let listing = state
        .repo
        .get_listing(id)
        .await?
        .ok_or_else(|| listing_not_found(id))?;

    render(EditTemplate { listing: &listing })
}

/// PUT /listings/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Validated(draft): Validated<ListingForm>,
) -> WebResult<Redirect> {
    let id = parse_id("listing", &id)?;
    if !state.repo.update_listing(id, draft).await? {
        return Err(listing_not_found(id).into());
    }

    tracing::info!(listing_id = %id, "listing updated");
    Ok(Redirect::to(&show_path(id)))
}

/// DELETE /listings/{id}
///
/// Reviews of the listing are deleted with it.
pub async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> WebResult<Redirect> {
    let id = parse_id("listing", &id)?;
    let deleted = state
        .repo
        .delete_listing(id)
        .await?
        .ok_or_else(|| listing_not_found(id))?;

    tracing::info!(listing_id = %id, reviews = deleted.reviews.len(), "listing deleted");
    Ok(Redirect::to("/listings"))
}

/// POST /listings/{id}/reviews
pub async fn create_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Validated(draft): Validated<ReviewForm>,
) -> WebResult<Redirect> {
    let id = parse_id("listing", &id)?;
    let review = Review::new(draft);
    let review_id = review.id;

    if !state.repo.add_review(id, review).await? {
        return Err(listing_not_found(id).into());
    }

    tracing::info!(listing_id = %id, review_id = %review_id, "review posted");
    Ok(Redirect::to(&show_path(id)))
}

/// DELETE /listings/{id}/reviews/{review_id}
pub async fn destroy_review(
    State(state): State<AppState>,
    Path((id, review_id)): Path<(String, String)>,
) -> WebResult<Redirect> {
    let id = parse_id("listing", &id)?;
    let review_id = parse_id("review", &review_id)?;

    match state.repo.remove_review(id, review_id).await? {
        ReviewRemoval::Removed => {
            tracing::info!(listing_id = %id, review_id = %review_id, "review deleted");
            Ok(Redirect::to(&show_path(id)))
        }
        ReviewRemoval::ListingMissing => Err(listing_not_found(id).into()),
        ReviewRemoval::ReviewMissing => Err(AppError::NotFound("Review", review_id.to_string()).into()),
    }
}
