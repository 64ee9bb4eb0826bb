pub mod address;
pub mod app;
pub mod config;
pub mod console;
pub mod error;
pub mod http_client;
pub mod models;
pub mod scan;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use error::{AppError, AppResult};
