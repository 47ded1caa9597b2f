pub mod config;
pub mod currency;
pub mod estimator;
pub mod logger;
pub mod models;
pub mod notifier;
pub mod shell;
pub mod telegram;
