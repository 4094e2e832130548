//! Backing products API.
//!
//! The dashboard talks to the catalog through `ProductsApi`; `HttpProductsApi`
//! is the production backend and `InMemoryProductsApi` serves demos and tests.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use prodboard_core::{DomainError, ProductId};
use prodboard_products::{CreateProductDto, Product, UpdateProductDto};

pub mod http;
pub mod memory;

pub use http::HttpProductsApi;
pub use memory::InMemoryProductsApi;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("product not found")]
    NotFound,

    #[error("validation failed: {0}")]
    Validation(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound => ApiError::NotFound,
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::InvalidId(msg) => ApiError::Validation(msg),
        }
    }
}

/// CRUD surface of the product catalog.
#[async_trait]
pub trait ProductsApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, ApiError>;

    async fn create(&self, dto: &CreateProductDto) -> Result<Product, ApiError>;

    async fn update(&self, id: ProductId, dto: &UpdateProductDto) -> Result<Product, ApiError>;

    async fn delete(&self, id: ProductId) -> Result<(), ApiError>;
}

#[async_trait]
impl<T: ProductsApi + ?Sized> ProductsApi for Arc<T> {
    async fn list(&self) -> Result<Vec<Product>, ApiError> {
        (**self).list().await
    }

    async fn create(&self, dto: &CreateProductDto) -> Result<Product, ApiError> {
        (**self).create(dto).await
    }

    async fn update(&self, id: ProductId, dto: &UpdateProductDto) -> Result<Product, ApiError> {
        (**self).update(id, dto).await
    }

    async fn delete(&self, id: ProductId) -> Result<(), ApiError> {
        (**self).delete(id).await
    }
}
