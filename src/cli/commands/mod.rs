//! CLI command implementations

pub mod config;
pub mod fetch;
pub mod posts;

pub use config::execute as config;
pub use fetch::execute as fetch;
pub use posts::execute as posts;
