//! Session refresh coordination.

mod coordinator;

pub use coordinator::{RefreshOutcome, Settlement, TokenRefreshCoordinator};
