use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prodboard_core::{DomainError, DomainResult, Entity, ProductId};

/// Currency used when a payload does not name one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Product record as returned by the backing API (read shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub description: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub currency: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Materialize a new record from a create payload.
    pub fn from_create(id: ProductId, dto: CreateProductDto, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: dto.name,
            sku: dto.sku,
            description: dto.description,
            price: dto.price,
            currency: dto.currency,
            stock: dto.stock,
            category: dto.category,
            created_at,
        }
    }

    /// Overwrite the fields present in `dto`; absent fields are left untouched.
    ///
    /// `id` and `created_at` are never touched.
    pub fn apply_update(&mut self, dto: &UpdateProductDto) {
        if let Some(name) = &dto.name {
            self.name = name.clone();
        }
        if let Some(sku) = &dto.sku {
            self.sku = sku.clone();
        }
        if let Some(description) = &dto.description {
            self.description = description.clone();
        }
        if let Some(price) = dto.price {
            self.price = price;
        }
        if let Some(currency) = &dto.currency {
            self.currency = currency.clone();
        }
        if let Some(stock) = dto.stock {
            self.stock = stock;
        }
        if let Some(category) = &dto.category {
            self.category = category.clone();
        }
    }

    /// Human readable price, e.g. `USD 12.50`.
    pub fn display_price(&self) -> String {
        format!("{} {}.{:02}", self.currency, self.price / 100, self.price % 100)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Write payload for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProductDto {
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub description: String,
    pub price: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub category: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl CreateProductDto {
    pub fn new(name: impl Into<String>, sku: impl Into<String>, price: u64) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            description: String::new(),
            price,
            currency: default_currency(),
            stock: 0,
            category: String::new(),
        }
    }

    /// Server-side payload checks.
    ///
    /// The dashboard never calls this itself; backends do before persisting.
    pub fn validate(&self) -> DomainResult<()> {
        validate_name(&self.name)?;
        validate_sku(&self.sku)?;
        validate_currency(&self.currency)
    }
}

/// Write payload for updating a product: every create field, each optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl UpdateProductDto {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Checks only the fields that are present.
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(sku) = &self.sku {
            validate_sku(sku)?;
        }
        if let Some(currency) = &self.currency {
            validate_currency(currency)?;
        }
        Ok(())
    }
}

impl From<CreateProductDto> for UpdateProductDto {
    fn from(dto: CreateProductDto) -> Self {
        Self {
            name: Some(dto.name),
            sku: Some(dto.sku),
            description: Some(dto.description),
            price: Some(dto.price),
            currency: Some(dto.currency),
            stock: Some(dto.stock),
            category: Some(dto.category),
        }
    }
}

impl From<&Product> for CreateProductDto {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            sku: product.sku.clone(),
            description: product.description.clone(),
            price: product.price,
            currency: product.currency.clone(),
            stock: product.stock,
            category: product.category.clone(),
        }
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(())
}

fn validate_sku(sku: &str) -> DomainResult<()> {
    if sku.trim().is_empty() {
        return Err(DomainError::validation("SKU cannot be empty"));
    }
    Ok(())
}

fn validate_currency(currency: &str) -> DomainResult<()> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(DomainError::validation(format!(
            "currency must be a 3-letter ISO code (got {currency:?})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product::from_create(
            ProductId::new(7),
            CreateProductDto {
                description: "Ceramic, 350ml".to_string(),
                stock: 12,
                category: "kitchen".to_string(),
                ..CreateProductDto::new("Mug", "MUG-001", 1250)
            },
            Utc::now(),
        )
    }

    #[test]
    fn from_create_copies_every_field() {
        let product = sample_product();
        assert_eq!(product.id(), ProductId::new(7));
        assert_eq!(product.name, "Mug");
        assert_eq!(product.sku, "MUG-001");
        assert_eq!(product.price, 1250);
        assert_eq!(product.currency, "USD");
        assert_eq!(product.stock, 12);
        assert_eq!(product.category, "kitchen");
    }

    #[test]
    fn apply_update_only_touches_present_fields() {
        let mut product = sample_product();
        let created_at = product.created_at;
        product.apply_update(&UpdateProductDto {
            price: Some(999),
            stock: Some(0),
            ..UpdateProductDto::default()
        });

        assert_eq!(product.price, 999);
        assert_eq!(product.stock, 0);
        assert!(!product.in_stock());
        assert_eq!(product.name, "Mug");
        assert_eq!(product.sku, "MUG-001");
        assert_eq!(product.id, ProductId::new(7));
        assert_eq!(product.created_at, created_at);
    }

    #[test]
    fn update_from_create_carries_every_field() {
        let create = CreateProductDto::new("Lamp", "LMP-9", 4500);
        let update: UpdateProductDto = create.clone().into();
        assert_eq!(update.name.as_deref(), Some("Lamp"));
        assert_eq!(update.sku.as_deref(), Some("LMP-9"));
        assert_eq!(update.price, Some(4500));
        assert_eq!(update.currency.as_deref(), Some("USD"));
        assert!(!update.is_empty());

        let mut product = sample_product();
        product.apply_update(&update);
        assert_eq!(CreateProductDto::from(&product), create);
    }

    #[test]
    fn create_rejects_blank_name() {
        let err = CreateProductDto::new("   ", "SKU-1", 100).validate().unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("name")),
            _ => panic!("Expected Validation error for empty name"),
        }
    }

    #[test]
    fn create_rejects_blank_sku() {
        let err = CreateProductDto::new("Thing", "", 100).validate().unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("SKU")),
            _ => panic!("Expected Validation error for empty SKU"),
        }
    }

    #[test]
    fn create_rejects_malformed_currency() {
        let dto = CreateProductDto {
            currency: "usd".to_string(),
            ..CreateProductDto::new("Thing", "SKU-1", 100)
        };
        assert!(matches!(dto.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn update_validates_only_present_fields() {
        assert!(UpdateProductDto::default().validate().is_ok());
        let dto = UpdateProductDto {
            name: Some(" ".to_string()),
            ..UpdateProductDto::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn display_price_formats_minor_units() {
        let mut product = sample_product();
        assert_eq!(product.display_price(), "USD 12.50");
        product.price = 5;
        assert_eq!(product.display_price(), "USD 0.05");
    }

    #[test]
    fn create_payload_defaults_currency_when_missing() {
        let dto: CreateProductDto =
            serde_json::from_str(r#"{"name":"Pen","sku":"PEN-1","price":150}"#).unwrap();
        assert_eq!(dto.currency, DEFAULT_CURRENCY);
        assert_eq!(dto.stock, 0);
    }

    #[test]
    fn update_payload_omits_absent_fields() {
        let dto = UpdateProductDto {
            stock: Some(3),
            ..UpdateProductDto::default()
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json, serde_json::json!({ "stock": 3 }));
    }
}
