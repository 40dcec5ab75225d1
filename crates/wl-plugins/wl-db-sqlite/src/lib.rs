//! # wl-db-sqlite Implementation
//!
//! This module implements the data mapping between SQLite rows and the
//! `wl-core` domain models. Listings and reviews are two tables; the
//! listing's review ids stay an ordered JSON array, as in a document store.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use uuid::Uuid;
use wl_core::models::{Listing, Review, ReviewRemoval};
use wl_core::traits::ListingRepo;
use wl_core::validation::ListingDraft;

pub struct SqliteListingRepo {
    pool: SqlitePool,
}

impl SqliteListingRepo {
    /// Opens (creating if needed) the database at `url` and applies migrations.
    ///
    /// `sqlite::memory:` databases live inside a single connection, so the
    /// pool is pinned to one connection that never expires.
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
        if url.contains(":memory:") {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }
        let pool = pool_options.connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(max_connections, "sqlite store ready");

        Ok(Self { pool })
    }
}

fn parse_uuid(raw: String) -> anyhow::Result<Uuid> {
    Ok(Uuid::parse_str(&raw)?)
}

fn listing_from_row(row: &SqliteRow) -> anyhow::Result<Listing> {
    Ok(Listing {
        id: parse_uuid(row.try_get("id")?)?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        image: row.try_get("image")?,
        price: row.try_get("price")?,
        location: row.try_get("location")?,
        country: row.try_get("country")?,
        reviews: serde_json::from_str(&row.try_get::<String, _>("reviews")?)?,
        created_at: row.try_get("created_at")?,
    })
}

fn review_from_row(row: &SqliteRow) -> anyhow::Result<Review> {
    Ok(Review {
        id: parse_uuid(row.try_get("id")?)?,
        comment: row.try_get("comment")?,
        rating: u8::try_from(row.try_get::<i64, _>("rating")?)?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl ListingRepo for SqliteListingRepo {
    async fn list_listings(&self) -> anyhow::Result<Vec<Listing>> {
        sqlx::query("SELECT * FROM listings ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(listing_from_row)
            .collect()
    }

    async fn get_listing(&self, id: Uuid) -> anyhow::Result<Option<Listing>> {
        let row = sqlx::query("SELECT * FROM listings WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(listing_from_row).transpose()
    }

    /// Resolves the listing's review ids in a single join, keeping the
    /// array order.
    async fn get_listing_with_reviews(&self, id: Uuid) -> anyhow::Result<Option<(Listing, Vec<Review>)>> {
        let Some(listing) = self.get_listing(id).await? else {
            return Ok(None);
        };

        let reviews = sqlx::query(
            "SELECT r.* FROM reviews r JOIN json_each(?) j ON r.id = j.value ORDER BY j.key",
        )
        .bind(serde_json::to_string(&listing.reviews)?)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(review_from_row)
        .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Some((listing, reviews)))
    }

    async fn create_listing(&self, listing: Listing) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO listings (id, title, description, image, price, location, country, reviews, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)")
            .bind(listing.id.to_string())
            .bind(listing.title)
            .bind(listing.description)
            .bind(listing.image)
            .bind(listing.price)
            .bind(listing.location)
            .bind(listing.country)
            .bind(serde_json::to_string(&listing.reviews)?)
            .bind(listing.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_listing(&self, id: Uuid, draft: ListingDraft) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE listings SET title = ?, description = ?, image = COALESCE(?, image), price = ?, location = ?, country = ? WHERE id = ?")
            .bind(draft.title)
            .bind(draft.description)
            .bind(draft.image)
            .bind(draft.price)
            .bind(draft.location)
            .bind(draft.country)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes the listing and its reviews in one transaction.
    async fn delete_listing(&self, id: Uuid) -> anyhow::Result<Option<Listing>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("DELETE FROM listings WHERE id = ? RETURNING *")
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await?;
        let Some(listing) = row.as_ref().map(listing_from_row).transpose()? else {
            return Ok(None);
        };

        let cascaded = sqlx::query("DELETE FROM reviews WHERE id IN (SELECT value FROM json_each(?))")
            .bind(serde_json::to_string(&listing.reviews)?)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(listing_id = %id, reviews = cascaded.rows_affected(), "cascaded review deletion");
        Ok(Some(listing))
    }

    /// Atomic operation to store a review and append its id.
    ///
    /// # Developer Note
    /// The append happens in SQL (`json_insert ... '$[#]'`) instead of a
    /// read-modify-write, so two reviews posted at once both land.
    async fn add_review(&self, listing_id: Uuid, review: Review) -> anyhow::Result<bool> {
        let mut tx = self.pool.begin().await?;

        let appended = sqlx::query("UPDATE listings SET reviews = json_insert(reviews, '$[#]', ?) WHERE id = ?")
            .bind(review.id.to_string())
            .bind(listing_id.to_string())
            .execute(&mut *tx)
            .await?;
        if appended.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("INSERT INTO reviews (id, comment, rating, created_at) VALUES (?, ?, ?, ?)")
            .bind(review.id.to_string())
            .bind(review.comment)
            .bind(i64::from(review.rating))
            .bind(review.created_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn remove_review(&self, listing_id: Uuid, review_id: Uuid) -> anyhow::Result<ReviewRemoval> {
        let mut tx = self.pool.begin().await?;

        // 1. Pull the reference, only if the listing holds it
        let pulled = sqlx::query(
            "UPDATE listings \
             SET reviews = (SELECT json_group_array(j.value) FROM json_each(listings.reviews) AS j WHERE j.value <> ?1) \
             WHERE id = ?2 AND EXISTS (SELECT 1 FROM json_each(listings.reviews) WHERE value = ?1)",
        )
        .bind(review_id.to_string())
        .bind(listing_id.to_string())
        .execute(&mut *tx)
        .await?;

        if pulled.rows_affected() == 0 {
            let exists = sqlx::query("SELECT 1 FROM listings WHERE id = ?")
                .bind(listing_id.to_string())
                .fetch_optional(&mut *tx)
                .await?
                .is_some();
            return Ok(if exists { ReviewRemoval::ReviewMissing } else { ReviewRemoval::ListingMissing });
        }

        // 2. Drop the review document
        sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(review_id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ReviewRemoval::Removed)
    }
}
