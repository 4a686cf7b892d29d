pub mod config;
pub mod cron;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod workers;
