pub mod accumulate;
pub mod aggregate;
pub mod pipeline;
pub mod rank;
pub mod reconcile;
pub mod scoring;
