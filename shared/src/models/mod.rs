//! Domain models for the RMC raw-materials inventory

mod alert;
mod material;
mod snapshot;
mod supplier;
mod transaction;

pub use alert::*;
pub use material::*;
pub use snapshot::*;
pub use supplier::*;
pub use transaction::*;
