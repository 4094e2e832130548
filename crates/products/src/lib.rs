//! Products catalog module.
//!
//! This crate contains the product read model, the write payloads used by the
//! dashboard, and the pure list queries (search, sort, pagination). It is
//! deterministic domain logic only (no IO, no HTTP, no storage).

pub mod product;
pub mod query;

pub use product::{CreateProductDto, Product, UpdateProductDto};
pub use query::{SortCriterion, matches_search, paginate, sort_products, total_pages};
