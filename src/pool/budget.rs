use std::sync::atomic::{AtomicU64, Ordering};

use crate::shutdown::ShutdownSender;

/// Total request budget shared by all workers of a run.
#[derive(Debug)]
pub struct IterationBudget {
    limit: u64,
    reserved: AtomicU64,
}

impl IterationBudget {
    #[must_use]
    pub fn new(limit: Option<u64>) -> Option<Self> {
        limit.map(|limit| IterationBudget {
            limit,
            reserved: AtomicU64::new(0),
        })
    }

    /// Reserves one request. Once the budget is spent the run is told to
    /// stop and `false` is returned.
    pub fn try_reserve(&self, shutdown_tx: &ShutdownSender) -> bool {
        loop {
            let current = self.reserved.load(Ordering::Relaxed);
            if current >= self.limit {
                drop(shutdown_tx.send(()));
                return false;
            }
            let Some(next) = current.checked_add(1) else {
                drop(shutdown_tx.send(()));
                return false;
            };
            if self
                .reserved
                .compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return true;
            }
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn reserved(&self) -> u64 {
        self.reserved.load(Ordering::Relaxed)
    }
}
