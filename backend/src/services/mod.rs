//! Services behind the reporting gateway

pub mod alerts;
pub mod reporting;
pub mod snapshot;

pub use alerts::AlertService;
pub use reporting::{ReportRequest, ReportingService};
pub use snapshot::{RefreshOutcome, SnapshotService, SnapshotStatus};
