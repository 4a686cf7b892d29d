use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Single-flight lock for one logical job.
#[derive(Debug, Clone)]
pub struct JobGuard {
    name: &'static str,
    lock: Arc<Mutex<()>>,
}

impl JobGuard {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `None` when a run of this job is already in flight.
    pub fn try_acquire(&self) -> Option<OwnedMutexGuard<()>> {
        self.lock.clone().try_lock_owned().ok()
    }

    /// Waits for the in-flight run, if any, to finish.
    pub async fn acquire(&self) -> OwnedMutexGuard<()> {
        self.lock.clone().lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_acquire_is_refused_while_held() {
        let guard = JobGuard::new("calculate");
        let held = guard.try_acquire().unwrap();
        assert!(guard.clone().try_acquire().is_none());

        drop(held);
        assert!(guard.try_acquire().is_some());
    }
}
