pub mod api;
pub mod config;
pub mod error;
pub mod prices;

// Re-export common modules
pub use api::router;
pub use config::Config;
pub use error::AppError;
