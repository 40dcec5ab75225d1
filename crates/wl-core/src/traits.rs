//! # Core Traits (Ports)
//!
//! Any storage plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Listing, Review, ReviewRemoval};
use crate::validation::ListingDraft;

/// Data persistence contract for listings and their reviews.
///
/// Listings and reviews live in separate collections; a listing only holds
/// the ids of its reviews.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait ListingRepo: Send + Sync {
    // Listing Operations
    /// All listings in creation order.
    async fn list_listings(&self) -> anyhow::Result<Vec<Listing>>;
    async fn get_listing(&self, id: Uuid) -> anyhow::Result<Option<Listing>>;
    /// The listing plus its reviews, in the order the listing references them.
    async fn get_listing_with_reviews(&self, id: Uuid) -> anyhow::Result<Option<(Listing, Vec<Review>)>>;
    async fn create_listing(&self, listing: Listing) -> anyhow::Result<()>;
    /// Returns `false` when no listing has this id.
    async fn update_listing(&self, id: Uuid, draft: ListingDraft) -> anyhow::Result<bool>;
    /// Deletes the listing and every review it references.
    async fn delete_listing(&self, id: Uuid) -> anyhow::Result<Option<Listing>>;

    // Review Operations
    /// Stores the review and appends its id to the listing in one step.
    /// Returns `false`, writing nothing, when the listing does not exist.
    async fn add_review(&self, listing_id: Uuid, review: Review) -> anyhow::Result<bool>;
    async fn remove_review(&self, listing_id: Uuid, review_id: Uuid) -> anyhow::Result<ReviewRemoval>;
}
