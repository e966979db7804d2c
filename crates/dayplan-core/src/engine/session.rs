//! Per-session state passed explicitly to every engine call.

use jiff::Timestamp;
use log::warn;

use crate::{models::PlanRecord, scheduler::SaveScheduler};

/// Reachability of the backing store as last observed by a session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// The last store operation succeeded, or none was attempted yet
    #[default]
    Connected,
    /// The last store operation failed; the session works in memory only
    Degraded { reason: String },
}

impl ConnectionStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, ConnectionStatus::Degraded { .. })
    }
}

/// The actively edited record together with its save bookkeeping.
///
/// A session is created by [`SyncEngine::open_session`] and owned by the
/// caller. The engine itself keeps no per-session state.
///
/// [`SyncEngine::open_session`]: super::SyncEngine::open_session
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub(crate) record: PlanRecord,
    pub(crate) scheduler: SaveScheduler,
    pub(crate) connection: ConnectionStatus,
}

impl SessionContext {
    pub(crate) fn new(record: PlanRecord, scheduler: SaveScheduler) -> Self {
        Self {
            record,
            scheduler,
            connection: ConnectionStatus::Connected,
        }
    }

    /// The active record.
    pub fn record(&self) -> &PlanRecord {
        &self.record
    }

    pub fn connection(&self) -> &ConnectionStatus {
        &self.connection
    }

    /// Time of the last successful write in this session.
    pub fn last_saved_at(&self) -> Option<Timestamp> {
        self.scheduler.last_saved_at()
    }

    pub fn scheduler(&self) -> &SaveScheduler {
        &self.scheduler
    }

    pub(crate) fn mark_connected(&mut self) {
        self.connection = ConnectionStatus::Connected;
    }

    pub(crate) fn mark_degraded(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        if !self.connection.is_degraded() {
            warn!("Store unreachable, continuing in memory: {reason}");
        }
        self.connection = ConnectionStatus::Degraded { reason };
    }
}
