//! wanderlust/crates/wl-core/src/lib.rs
//!
//! The central domain types and interface definitions for Wanderlust.

pub mod error;
pub mod models;
pub mod traits;
pub mod validation;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;
pub use validation::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use super::validation::ListingDraft;

    fn draft(title: &str) -> ListingDraft {
        ListingDraft {
            title: title.to_string(),
            description: "Two rooms by the lake".to_string(),
            image: None,
            price: 1200.0,
            location: "Bled".to_string(),
            country: "Slovenia".to_string(),
        }
    }

    #[test]
    fn test_listing_creation_v7() {
        let first = Listing::new(draft("Cabin"));
        let second = Listing::new(draft("Cottage"));
        assert!(first.reviews.is_empty());
        // v7 ids sort in creation order
        assert!(first.id < second.id);
    }
}
