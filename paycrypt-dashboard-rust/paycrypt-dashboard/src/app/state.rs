use paycrypt_admin_core::{AdminCore, ChainClients, SelectionState};
use std::sync::Arc;
use std::time::Instant;

use crate::domain::error::DashboardResult;

/// Shared state of every request: the single admin core of this process.
pub struct AppState {
    pub admin: AdminCore,
    started_at: Instant,
}

impl AppState {
    pub fn new(admin: AdminCore) -> Self {
        Self {
            admin,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn selection(&self) -> SelectionState {
        self.admin.coordinator.state()
    }

    /// Clients of the chain currently selected.
    pub fn current_clients(&self) -> DashboardResult<Arc<ChainClients>> {
        Ok(self.admin.clients.current(&self.admin.coordinator)?)
    }
}
