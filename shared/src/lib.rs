//! Shared types and models for the RMC Raw-Materials Inventory
//!
//! This crate contains the domain models, the upstream wire adapter and the
//! reporting engine shared between the backend gateway and the browser (via WASM).

pub mod alerts;
pub mod models;
pub mod reports;
pub mod types;
pub mod validation;
pub mod wire;

pub use alerts::*;
pub use models::*;
pub use types::*;
pub use validation::*;
