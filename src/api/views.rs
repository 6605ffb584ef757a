//! Best-effort view counting.
//!
//! Reads bump a view counter before loading the entity. The bump must never
//! decide the outcome of the read, so its result is reduced to a
//! `ViewRecord` and failures are only logged.

use std::future::Future;

use tracing::{debug, warn};

use crate::db::{DbResult, Id};

/// What happened to a view increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRecord {
    Counted,
    /// No row matched the id.
    Missing,
    /// The increment failed and was skipped.
    Failed,
}

/// Await a view increment, logging instead of propagating failure.
pub async fn record_view<F>(entity: &str, id: Id, increment: F) -> ViewRecord
where
    F: Future<Output = DbResult<bool>>,
{
    match increment.await {
        Ok(true) => ViewRecord::Counted,
        Ok(false) => {
            debug!(entity, id, "no row to count a view for");
            ViewRecord::Missing
        }
        Err(e) => {
            warn!(entity, id, error = %e, "view increment failed, continuing with read");
            ViewRecord::Failed
        }
    }
}
