pub mod cron;
pub mod job_guard;
pub mod logging;
pub mod shutdown;
