//! # Validation Schemas
//!
//! Incoming form payloads are deserialized into loosely-typed `*Form` structs
//! (every field optional, every value a string) and then checked against
//! their schema. A passing form yields a typed draft; a failing one yields
//! every violated field, not just the first.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A structural schema for a request payload.
pub trait Schema: DeserializeOwned + Send {
    /// The typed value a valid payload turns into.
    type Output: Send;

    fn validate(self) -> Result<Self::Output, ValidationErrors>;
}

/// Every rule a payload broke, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    details: Vec<String>,
}

impl ValidationErrors {
    pub fn new(details: Vec<String>) -> Self {
        Self { details }
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.details.join(","))
    }
}

impl std::error::Error for ValidationErrors {}

/// Collects violations for one object of a payload (`listing`, `review`).
struct Checker {
    object: &'static str,
    details: Vec<String>,
}

impl Checker {
    fn new(object: &'static str) -> Self {
        Self { object, details: Vec::new() }
    }

    fn fail(&mut self, field: &str, rule: &str) {
        self.details.push(format!("\"{}.{}\" {}", self.object, field, rule));
    }

    fn required_str(&mut self, field: &str, value: Option<String>) -> String {
        match value {
            None => {
                self.fail(field, "is required");
                String::new()
            }
            Some(v) if v.is_empty() => {
                self.fail(field, "is not allowed to be empty");
                String::new()
            }
            Some(v) => v,
        }
    }

    fn required_number(&mut self, field: &str, value: Option<String>) -> Option<f64> {
        let Some(raw) = value else {
            self.fail(field, "is required");
            return None;
        };
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Some(n),
            _ => {
                self.fail(field, "must be a number");
                None
            }
        }
    }

    fn min(&mut self, field: &str, value: f64, limit: f64) -> bool {
        if value < limit {
            self.fail(field, &format!("must be greater than or equal to {limit}"));
            return false;
        }
        true
    }

    fn max(&mut self, field: &str, value: f64, limit: f64) -> bool {
        if value > limit {
            self.fail(field, &format!("must be less than or equal to {limit}"));
            return false;
        }
        true
    }

    fn finish<T>(self, output: T) -> Result<T, ValidationErrors> {
        if self.details.is_empty() {
            Ok(output)
        } else {
            Err(ValidationErrors::new(self.details))
        }
    }
}

/// Raw `listing[...]` fields of the create and update forms.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListingForm {
    #[serde(rename = "listing[title]")]
    pub title: Option<String>,
    #[serde(rename = "listing[description]")]
    pub description: Option<String>,
    #[serde(rename = "listing[image]")]
    pub image: Option<String>,
    #[serde(rename = "listing[price]")]
    pub price: Option<String>,
    #[serde(rename = "listing[location]")]
    pub location: Option<String>,
    #[serde(rename = "listing[country]")]
    pub country: Option<String>,
}

impl ListingForm {
    fn is_absent(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.price.is_none()
            && self.location.is_none()
            && self.country.is_none()
    }
}

/// A listing payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    /// `None` when the form left the image blank
    pub image: Option<String>,
    pub price: f64,
    pub location: String,
    pub country: String,
}

impl Schema for ListingForm {
    type Output = ListingDraft;

    fn validate(self) -> Result<ListingDraft, ValidationErrors> {
        if self.is_absent() {
            return Err(ValidationErrors::new(vec!["\"listing\" is required".to_string()]));
        }

        let mut check = Checker::new("listing");
        let title = check.required_str("title", self.title);
        let description = check.required_str("description", self.description);
        let price = check
            .required_number("price", self.price)
            .filter(|&p| check.min("price", p, 0.0))
            .unwrap_or_default();
        let location = check.required_str("location", self.location);
        let country = check.required_str("country", self.country);
        let image = self.image.filter(|i| !i.trim().is_empty());

        check.finish(ListingDraft { title, description, image, price, location, country })
    }
}

/// Raw `review[...]` fields of the review form.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ReviewForm {
    #[serde(rename = "review[rating]")]
    pub rating: Option<String>,
    #[serde(rename = "review[comment]")]
    pub comment: Option<String>,
}

/// A review payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDraft {
    pub comment: String,
    pub rating: u8,
}

impl Schema for ReviewForm {
    type Output = ReviewDraft;

    fn validate(self) -> Result<ReviewDraft, ValidationErrors> {
        if self.rating.is_none() && self.comment.is_none() {
            return Err(ValidationErrors::new(vec!["\"review\" is required".to_string()]));
        }

        let mut check = Checker::new("review");
        let rating = check.required_number("rating", self.rating).and_then(|r| {
            if r.fract() != 0.0 {
                check.fail("rating", "must be an integer");
                return None;
            }
            (check.min("rating", r, 1.0) && check.max("rating", r, 5.0)).then_some(r as u8)
        });
        let comment = check.required_str("comment", self.comment);

        check.finish(ReviewDraft { comment, rating: rating.unwrap_or_default() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_form() -> ListingForm {
        ListingForm {
            title: Some("Treehouse".into()),
            description: Some("Among the pines".into()),
            image: Some("".into()),
            price: Some("1500".into()),
            location: Some("Aspen".into()),
            country: Some("United States".into()),
        }
    }

    #[test]
    fn valid_listing_becomes_draft() {
        let draft = listing_form().validate().unwrap();
        assert_eq!(draft.title, "Treehouse");
        assert_eq!(draft.price, 1500.0);
        // blank image means "use the default"
        assert_eq!(draft.image, None);
    }

    #[test]
    fn every_violation_is_reported() {
        let form = ListingForm {
            title: None,
            description: Some("".into()),
            price: Some("-3".into()),
            ..listing_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(
            err.details(),
            [
                "\"listing.title\" is required",
                "\"listing.description\" is not allowed to be empty",
                "\"listing.price\" must be greater than or equal to 0",
            ]
        );
        assert_eq!(
            err.to_string(),
            "\"listing.title\" is required,\"listing.description\" is not allowed to be empty,\"listing.price\" must be greater than or equal to 0"
        );
    }

    #[test]
    fn non_numeric_price_is_rejected() {
        let form = ListingForm { price: Some("cheap".into()), ..listing_form() };
        let err = form.validate().unwrap_err();
        assert_eq!(err.details(), ["\"listing.price\" must be a number"]);
    }

    #[test]
    fn absent_listing_object() {
        let err = ListingForm::default().validate().unwrap_err();
        assert_eq!(err.to_string(), "\"listing\" is required");
    }

    #[test]
    fn review_rating_bounds() {
        let ok = ReviewForm { rating: Some("4".into()), comment: Some("Great host".into()) };
        assert_eq!(ok.validate().unwrap(), ReviewDraft { comment: "Great host".into(), rating: 4 });

        let high = ReviewForm { rating: Some("6".into()), comment: Some("!".into()) };
        assert_eq!(
            high.validate().unwrap_err().details(),
            ["\"review.rating\" must be less than or equal to 5"]
        );

        let low = ReviewForm { rating: Some("0".into()), comment: None };
        assert_eq!(
            low.validate().unwrap_err().details(),
            [
                "\"review.rating\" must be greater than or equal to 1",
                "\"review.comment\" is required",
            ]
        );

        let half = ReviewForm { rating: Some("3.5".into()), comment: Some("ok".into()) };
        assert_eq!(half.validate().unwrap_err().details(), ["\"review.rating\" must be an integer"]);
    }

    #[test]
    fn form_keys_use_bracket_names() {
        let form: ReviewForm = serde_json::from_value(serde_json::json!({
            "review[rating]": "5",
            "review[comment]": "Spotless"
        }))
        .unwrap();
        assert_eq!(form.rating.as_deref(), Some("5"));
        assert_eq!(form.comment.as_deref(), Some("Spotless"));
    }
}
