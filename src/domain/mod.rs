//! Emissions dashboard domain: records and seed data

pub mod records;
pub mod seed;

pub use records::{Company, Country, GhgEmission, Post, PostDraft};
