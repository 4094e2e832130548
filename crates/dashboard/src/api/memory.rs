//! In-process `ProductsApi`.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use prodboard_core::{Entity, ProductId};
use prodboard_products::{CreateProductDto, Product, UpdateProductDto};

use super::{ApiError, ProductsApi};

#[derive(Debug, Default)]
struct Catalog {
    last_id: u64,
    products: BTreeMap<ProductId, Product>,
}

/// Catalog held in memory. Clones share the same records.
///
/// Applies the same payload validation as the server so that invalid saves
/// surface as `ApiError::Validation`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductsApi {
    catalog: Arc<RwLock<Catalog>>,
}

impl InMemoryProductsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut catalog = Catalog::default();
        for product in products {
            catalog.last_id = catalog.last_id.max(product.id().get());
            catalog.products.insert(product.id(), product);
        }
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }

    /// A small catalog for `--demo` runs.
    pub fn demo() -> Self {
        let now = Utc::now();
        let seed = [
            ("Desk Lamp", "LMP-001", 3499, 14, "lighting"),
            ("Standing Desk", "DSK-120", 45900, 3, "furniture"),
            ("Ergonomic Chair", "CHR-210", 28900, 0, "furniture"),
            ("Notebook A5", "NTB-005", 699, 240, "stationery"),
            ("Fountain Pen", "PEN-017", 4200, 35, "stationery"),
            ("Monitor Arm", "ARM-330", 11900, 9, "accessories"),
            ("USB-C Hub", "HUB-007", 5900, 61, "accessories"),
            ("Cable Tray", "TRY-044", 2450, 18, "accessories"),
            ("Whiteboard", "WBD-090", 8900, 5, "office"),
            ("Paper Shredder", "SHR-101", 13900, 2, "office"),
        ];
        let count = seed.len() as i64;
        Self::with_products(seed.into_iter().enumerate().map(
            |(i, (name, sku, price, stock, category))| {
                let id = i as u64 + 1;
                Product::from_create(
                    ProductId::new(id),
                    CreateProductDto {
                        stock,
                        category: category.to_string(),
                        ..CreateProductDto::new(name, sku, price)
                    },
                    now - Duration::days(count - i as i64),
                )
            },
        ))
    }

    pub fn len(&self) -> usize {
        self.catalog.read().map(|c| c.products.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.catalog
            .read()
            .ok()
            .and_then(|c| c.products.get(&id).cloned())
    }
}

fn poisoned() -> ApiError {
    ApiError::Network("in-memory catalog lock poisoned".to_string())
}

#[async_trait]
impl ProductsApi for InMemoryProductsApi {
    async fn list(&self) -> Result<Vec<Product>, ApiError> {
        let catalog = self.catalog.read().map_err(|_| poisoned())?;
        Ok(catalog.products.values().cloned().collect())
    }

    async fn create(&self, dto: &CreateProductDto) -> Result<Product, ApiError> {
        dto.validate()?;
        let mut catalog = self.catalog.write().map_err(|_| poisoned())?;
        catalog.last_id += 1;
        let product = Product::from_create(ProductId::new(catalog.last_id), dto.clone(), Utc::now());
        catalog.products.insert(product.id(), product.clone());
        Ok(product)
    }

    async fn update(&self, id: ProductId, dto: &UpdateProductDto) -> Result<Product, ApiError> {
        dto.validate()?;
        let mut catalog = self.catalog.write().map_err(|_| poisoned())?;
        let product = catalog.products.get_mut(&id).ok_or(ApiError::NotFound)?;
        product.apply_update(dto);
        Ok(product.clone())
    }

    async fn delete(&self, id: ProductId) -> Result<(), ApiError> {
        let mut catalog = self.catalog.write().map_err(|_| poisoned())?;
        catalog
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or(ApiError::NotFound)
    }
}
