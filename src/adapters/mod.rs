// Adapters layer: concrete implementations for external systems.

pub mod catalog;
pub mod supplier;
