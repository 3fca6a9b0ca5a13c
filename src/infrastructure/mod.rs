// Infrastructure layer - External dependencies and adapters
pub mod catalog_client;
pub mod config;
pub mod count_client;
pub mod credential_store;
pub mod mqtt_broker;
