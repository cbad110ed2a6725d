pub mod improvements_route;
pub mod quick_review_request;
pub mod quick_review_route;
pub mod review_response;
pub mod review_status_route;
pub mod trigger_review_request;
pub mod trigger_review_route;
