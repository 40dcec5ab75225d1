//! # Domain Models
//!
//! These structs represent the core entities of Wanderlust.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{ListingDraft, ReviewDraft};

/// Shown for listings that were saved without an image.
pub const DEFAULT_IMAGE: &str =
    "https://images.unsplash.com/photo-1625505826533-5c80aca7d157?auto=format&fit=crop&w=800&q=60";

/// A rentable place (e.g., a cabin, an apartment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// URL of the cover image; `None` falls back to [`DEFAULT_IMAGE`]
    pub image: Option<String>,
    pub price: f64,
    pub location: String,
    pub country: String,
    /// Ids of the reviews attached to this listing, oldest first
    pub reviews: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    pub fn new(draft: ListingDraft) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: draft.title,
            description: draft.description,
            image: draft.image,
            price: draft.price,
            location: draft.location,
            country: draft.country,
            reviews: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Overwrites the listing's fields with a validated update.
    ///
    /// A draft without an image keeps the stored one.
    pub fn apply(&mut self, draft: ListingDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.price = draft.price;
        self.location = draft.location;
        self.country = draft.country;
        if draft.image.is_some() {
            self.image = draft.image;
        }
    }

    pub fn image_url(&self) -> &str {
        self.image.as_deref().unwrap_or(DEFAULT_IMAGE)
    }

    /// Raw image value for pre-filling the edit form.
    pub fn image_value(&self) -> &str {
        self.image.as_deref().unwrap_or_default()
    }
}

/// A single rating and comment left on one listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub comment: String,
    /// 1 to 5
    pub rating: u8,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(draft: ReviewDraft) -> Self {
        Self {
            id: Uuid::now_v7(),
            comment: draft.comment,
            rating: draft.rating,
            created_at: Utc::now(),
        }
    }

    pub fn posted_on(&self) -> String {
        self.created_at.format("%b %-d, %Y").to_string()
    }
}

/// Outcome of detaching a review from its listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewRemoval {
    /// Reference pulled and review document deleted
    Removed,
    ListingMissing,
    /// The listing does not reference this review
    ReviewMissing,
}
