//! Syncache - client-side data-sync cache
//!
//! A keyed cache with single-flight fetches and subscriber fan-out, plus a
//! mutation coordinator that applies writes optimistically and rolls them
//! back when the remote rejects them.

pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod mutation;
pub mod remote;
pub mod store;
pub mod ui;

pub use error::{SyncacheError, SyncacheResult};
