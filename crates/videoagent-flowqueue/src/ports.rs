//! Advisory lock table for browser debugging ports.
//!
//! Consulted before a job drives a browser. It is not a semaphore: a
//! check-then-act race between two jobs naming the same port is possible and
//! tolerated, since the downstream submission is retryable.

use std::collections::HashMap;

use uuid::Uuid;

/// Mapping from debugging port to the job currently driving it.
#[derive(Debug, Default)]
pub struct PortLockTable {
    holders: HashMap<u16, Uuid>,
}

impl PortLockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `port` as held by `task_id`, replacing any previous holder.
    pub fn lock(&mut self, port: u16, task_id: Uuid) {
        self.holders.insert(port, task_id);
    }

    /// Release `port` if it is still held by `task_id`.
    pub fn unlock(&mut self, port: u16, task_id: Uuid) -> bool {
        match self.holders.get(&port) {
            Some(holder) if *holder == task_id => {
                self.holders.remove(&port);
                true
            }
            _ => false,
        }
    }

    pub fn holder(&self, port: u16) -> Option<Uuid> {
        self.holders.get(&port).copied()
    }

    /// True when `port` is held by a job other than `task_id`.
    pub fn is_held_by_other(&self, port: u16, task_id: Uuid) -> bool {
        self.holder(port).is_some_and(|holder| holder != task_id)
    }

    /// Locked ports in ascending order.
    pub fn locked_ports(&self) -> Vec<u16> {
        let mut ports: Vec<u16> = self.holders.keys().copied().collect();
        ports.sort_unstable();
        ports
    }
}
