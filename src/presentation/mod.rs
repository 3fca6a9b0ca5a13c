// Presentation layer - HTTP rendering of the views
pub mod app_state;
pub mod handlers;
