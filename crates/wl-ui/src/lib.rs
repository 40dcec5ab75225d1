use askama::Template;
use wl_core::models::{Listing, Review};

#[derive(Template)]
#[template(path = "listings/index.html")]
pub struct IndexTemplate<'a> {
    pub listings: &'a [Listing],
}

#[derive(Template)]
#[template(path = "listings/new.html")]
pub struct NewListingTemplate;

#[derive(Template)]
#[template(path = "listings/show.html")]
pub struct ShowTemplate<'a> {
    pub listing: &'a Listing,
    pub reviews: &'a [Review],
}

#[derive(Template)]
#[template(path = "listings/edit.html")]
pub struct EditTemplate<'a> {
    pub listing: &'a Listing,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub status: u16,
    pub message: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wl_core::validation::{ListingDraft, ReviewDraft};

    fn listing() -> Listing {
        Listing::new(ListingDraft {
            title: "Desert <Dome>".into(),
            description: "Stargazing".into(),
            image: None,
            price: 340.0,
            location: "Joshua Tree".into(),
            country: "United States".into(),
        })
    }

    #[test]
    fn show_page_escapes_and_lists_reviews() {
        let listing = listing();
        let reviews = [Review::new(ReviewDraft { comment: "Clear skies".into(), rating: 5 })];
        let html = ShowTemplate { listing: &listing, reviews: &reviews }.render().unwrap();

        assert!(html.contains("Desert &#60;Dome&#62;") || html.contains("Desert &lt;Dome&gt;"));
        assert!(html.contains("Clear skies"));
        assert!(html.contains(&format!("/listings/{}/reviews/{}?_method=DELETE", listing.id, reviews[0].id)));
    }

    #[test]
    fn edit_form_posts_with_put_override() {
        let listing = listing();
        let html = EditTemplate { listing: &listing }.render().unwrap();
        assert!(html.contains(&format!("/listings/{}?_method=PUT", listing.id)));
        assert!(html.contains("name=\"listing[title]\""));
    }

    #[test]
    fn error_page_shows_message() {
        let html = ErrorTemplate { status: 404, message: "Page Not Found!" }.render().unwrap();
        assert!(html.contains("Page Not Found!"));
    }
}
