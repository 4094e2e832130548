//! `prodboard-dashboard`
//!
//! **Responsibility:** The products dashboard page and its terminal shell.
//!
//! This crate provides:
//! - The products data store (fetch, search, sort, paginate, mutate)
//! - The page controller (auth gating, initial load, modal, confirmations)
//! - Render-state selection and the screen view model
//!
//! The backing catalog API is the authority; the dashboard keeps no offline copy.

pub mod api;
pub mod capabilities;
pub mod cli;
pub mod config;
pub mod controller;
pub mod loader;
pub mod render;
pub mod shell;
pub mod store;

pub use api::{ApiError, HttpProductsApi, InMemoryProductsApi, ProductsApi};
pub use capabilities::{Confirm, Navigator, RouteHistory, TerminalConfirm};
pub use cli::Cli;
pub use config::{ConfigError, DashboardConfig, StorageLocation};
pub use controller::{LoadPhase, LogoutError, Modal, ProductsController};
pub use loader::Loader;
pub use render::{RenderState, Screen};
pub use store::ProductsStore;
