use std::future::Future;
use tokio::sync::watch;

use crate::error::PointsError;

/// Sending half of the shutdown signal, held by `main`.
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

/// Cancellation signal observed by every await point of a run.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> (ShutdownTrigger, Shutdown) {
        let (tx, rx) = watch::channel(false);
        (ShutdownTrigger { tx }, Shutdown { rx })
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown has been triggered.
    ///
    /// A dropped trigger that never fired is not a shutdown: the future then
    /// stays pending.
    pub async fn triggered(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|stopped| *stopped).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Drives `fut` unless shutdown fires first, in which case `fut` is
    /// dropped and [`PointsError::Cancelled`] is returned.
    pub async fn run_until<F, T>(&self, fut: F) -> Result<T, PointsError>
    where
        F: Future<Output = Result<T, PointsError>>,
    {
        if self.is_triggered() {
            return Err(PointsError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.triggered() => Err(PointsError::Cancelled),
            res = fut => res,
        }
    }
}
