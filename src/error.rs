use thiserror::Error;

#[derive(Debug, Error)]
pub enum PointsError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("run cancelled by shutdown")]
    Cancelled,
    #[error("apply worker is no longer receiving hand-offs")]
    HandoffClosed,
}
