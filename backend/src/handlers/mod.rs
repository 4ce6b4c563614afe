//! HTTP handlers for the reporting gateway

pub mod alerts;
pub mod dashboard;
pub mod health;
pub mod inventory;
pub mod reports;

pub use alerts::*;
pub use dashboard::*;
pub use health::*;
pub use inventory::*;
pub use reports::*;
