// Application layer - View components and the ports they depend on
pub mod alert_feed;
pub mod broker;
pub mod catalog_provider;
pub mod credential_store;
pub mod dashboard_service;
pub mod order_count;
pub mod view_state;

#[cfg(test)]
pub(crate) mod fakes;
