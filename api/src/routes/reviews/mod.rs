pub mod delete_review_route;
pub mod get_review_route;
pub mod list_reviews_route;
