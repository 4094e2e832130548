//! `prodboard-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the product
//! catalog and the dashboard (no IO, no HTTP, no storage).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::ProductId;
