//! Cascading removal of a user and the records that depend on it.

mod error;
mod planning;
mod remover;
mod report;

pub use error::{CleanupError, Result};
pub use planning::{format_plan, CleanupPlan, PlannedDependents, PlannedSubscription};
pub use remover::{CascadingRemover, ResolvedTables};
pub use report::{DependentsOutcome, RemovalReport, SubscriptionOutcome};
