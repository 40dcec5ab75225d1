//! # wl-store-memory
//!
//! In-process implementation of `ListingRepo`.
//! Nothing survives a restart; useful for tests and for trying the app
//! without a database file.
//!
//! Lock order is always listings before reviews, and no guard is held
//! across an await point.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;
use wl_core::models::{Listing, Review, ReviewRemoval};
use wl_core::traits::ListingRepo;
use wl_core::validation::ListingDraft;

#[derive(Clone, Default)]
pub struct MemoryListingRepo {
    listings: Arc<DashMap<Uuid, Listing>>,
    reviews: Arc<DashMap<Uuid, Review>>,
}

impl MemoryListingRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored review documents, attached or not.
    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }
}

#[async_trait]
impl ListingRepo for MemoryListingRepo {
    async fn list_listings(&self) -> anyhow::Result<Vec<Listing>> {
        let mut all: Vec<Listing> = self.listings.iter().map(|e| e.value().clone()).collect();
        // v7 ids are time ordered
        all.sort_by_key(|l| l.id);
        Ok(all)
    }

    async fn get_listing(&self, id: Uuid) -> anyhow::Result<Option<Listing>> {
        Ok(self.listings.get(&id).map(|l| l.clone()))
    }

    async fn get_listing_with_reviews(&self, id: Uuid) -> anyhow::Result<Option<(Listing, Vec<Review>)>> {
        let Some(listing) = self.listings.get(&id).map(|l| l.clone()) else {
            return Ok(None);
        };
        let reviews = listing
            .reviews
            .iter()
            .filter_map(|rid| self.reviews.get(rid).map(|r| r.clone()))
            .collect();
        Ok(Some((listing, reviews)))
    }

    async fn create_listing(&self, listing: Listing) -> anyhow::Result<()> {
        self.listings.insert(listing.id, listing);
        Ok(())
    }

    async fn update_listing(&self, id: Uuid, draft: ListingDraft) -> anyhow::Result<bool> {
        match self.listings.get_mut(&id) {
            Some(mut listing) => {
                listing.apply(draft);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_listing(&self, id: Uuid) -> anyhow::Result<Option<Listing>> {
        let Some((_, listing)) = self.listings.remove(&id) else {
            return Ok(None);
        };
        for rid in &listing.reviews {
            self.reviews.remove(rid);
        }
        tracing::debug!(listing_id = %id, reviews = listing.reviews.len(), "cascaded review deletion");
        Ok(Some(listing))
    }

    async fn add_review(&self, listing_id: Uuid, review: Review) -> anyhow::Result<bool> {
        // Holding the entry guard makes the append atomic per listing.
        let Some(mut listing) = self.listings.get_mut(&listing_id) else {
            return Ok(false);
        };
        listing.reviews.push(review.id);
        self.reviews.insert(review.id, review);
        Ok(true)
    }

    async fn remove_review(&self, listing_id: Uuid, review_id: Uuid) -> anyhow::Result<ReviewRemoval> {
        let Some(mut listing) = self.listings.get_mut(&listing_id) else {
            return Ok(ReviewRemoval::ListingMissing);
        };
        let Some(pos) = listing.reviews.iter().position(|rid| *rid == review_id) else {
            return Ok(ReviewRemoval::ReviewMissing);
        };
        listing.reviews.remove(pos);
        self.reviews.remove(&review_id);
        Ok(ReviewRemoval::Removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wl_core::validation::ReviewDraft;

    fn draft(title: &str) -> ListingDraft {
        ListingDraft {
            title: title.into(),
            description: "Sunny loft".into(),
            image: None,
            price: 250.0,
            location: "Lisbon".into(),
            country: "Portugal".into(),
        }
    }

    fn review(comment: &str) -> Review {
        Review::new(ReviewDraft { comment: comment.into(), rating: 4 })
    }

    #[tokio::test]
    async fn listings_come_back_in_creation_order() {
        let repo = MemoryListingRepo::new();
        for title in ["first", "second", "third"] {
            repo.create_listing(Listing::new(draft(title))).await.unwrap();
        }
        let titles: Vec<_> = repo.list_listings().await.unwrap().into_iter().map(|l| l.title).collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn review_add_and_remove_keeps_both_sides_in_step() {
        let repo = MemoryListingRepo::new();
        let listing = Listing::new(draft("loft"));
        let id = listing.id;
        repo.create_listing(listing).await.unwrap();

        let r = review("Great view");
        let rid = r.id;
        assert!(repo.add_review(id, r).await.unwrap());

        let (listing, reviews) = repo.get_listing_with_reviews(id).await.unwrap().unwrap();
        assert_eq!(listing.reviews, vec![rid]);
        assert_eq!(reviews[0].comment, "Great view");

        assert_eq!(repo.remove_review(id, rid).await.unwrap(), ReviewRemoval::Removed);
        assert_eq!(repo.remove_review(id, rid).await.unwrap(), ReviewRemoval::ReviewMissing);
        assert!(repo.get_listing(id).await.unwrap().unwrap().reviews.is_empty());
        assert_eq!(repo.review_count(), 0);
    }

    #[tokio::test]
    async fn review_on_missing_listing_writes_nothing() {
        let repo = MemoryListingRepo::new();
        assert!(!repo.add_review(Uuid::now_v7(), review("ghost")).await.unwrap());
        assert_eq!(repo.review_count(), 0);
        assert_eq!(
            repo.remove_review(Uuid::now_v7(), Uuid::now_v7()).await.unwrap(),
            ReviewRemoval::ListingMissing
        );
    }

    #[tokio::test]
    async fn deleting_listing_cascades_to_reviews() {
        let repo = MemoryListingRepo::new();
        let listing = Listing::new(draft("loft"));
        let id = listing.id;
        repo.create_listing(listing).await.unwrap();
        repo.add_review(id, review("a")).await.unwrap();
        repo.add_review(id, review("b")).await.unwrap();

        let deleted = repo.delete_listing(id).await.unwrap().unwrap();
        assert_eq!(deleted.reviews.len(), 2);
        assert_eq!(repo.review_count(), 0);
        assert!(repo.delete_listing(id).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_review_posts_are_not_lost() {
        let repo = MemoryListingRepo::new();
        let listing = Listing::new(draft("busy"));
        let id = listing.id;
        repo.create_listing(listing).await.unwrap();

        let tasks: Vec<_> = (0..64)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.add_review(id, review(&format!("#{i}"))).await })
            })
            .collect();
        for t in tasks {
            assert!(t.await.unwrap().unwrap());
        }

        let listing = repo.get_listing(id).await.unwrap().unwrap();
        assert_eq!(listing.reviews.len(), 64);
        assert_eq!(repo.review_count(), 64);
    }
}
