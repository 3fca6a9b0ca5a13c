// Domain layer - Entities and pure derivations
pub mod anomaly;
pub mod catalog;
pub mod dashboard;
pub mod navigation;
