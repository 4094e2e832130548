//! List queries over the product catalog: search, sort, pagination.
//!
//! All functions are pure; the dashboard store applies them to whatever list
//! the backing API returned.

use core::str::FromStr;
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use prodboard_core::DomainError;

use crate::product::Product;

/// Ordering applied to the product grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortCriterion {
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    #[default]
    Newest,
    Oldest,
}

impl SortCriterion {
    pub const ALL: [SortCriterion; 6] = [
        SortCriterion::NameAsc,
        SortCriterion::NameDesc,
        SortCriterion::PriceAsc,
        SortCriterion::PriceDesc,
        SortCriterion::Newest,
        SortCriterion::Oldest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortCriterion::NameAsc => "name-asc",
            SortCriterion::NameDesc => "name-desc",
            SortCriterion::PriceAsc => "price-asc",
            SortCriterion::PriceDesc => "price-desc",
            SortCriterion::Newest => "newest",
            SortCriterion::Oldest => "oldest",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let primary = match self {
            SortCriterion::NameAsc => cmp_names(a, b),
            SortCriterion::NameDesc => cmp_names(b, a),
            SortCriterion::PriceAsc => a.price.cmp(&b.price),
            SortCriterion::PriceDesc => b.price.cmp(&a.price),
            SortCriterion::Newest => b.created_at.cmp(&a.created_at),
            SortCriterion::Oldest => a.created_at.cmp(&b.created_at),
        };
        // Ties fall back to id so the grid is stable across reloads.
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

fn cmp_names(a: &Product, b: &Product) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

impl core::fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortCriterion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SortCriterion::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "unknown sort criterion {s:?} (expected one of: name-asc, name-desc, price-asc, price-desc, newest, oldest)"
                ))
            })
    }
}

/// Case-insensitive substring match on name, SKU and category.
///
/// A blank term matches everything.
pub fn matches_search(product: &Product, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [&product.name, &product.sku, &product.category]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn sort_products(products: &mut [Product], criterion: SortCriterion) {
    products.sort_by(|a, b| criterion.compare(a, b));
}

/// Number of pages needed for `total_items`; never less than 1.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total_items.div_ceil(page_size).max(1)
}

/// Slice of `items` shown on the 1-based `page`.
///
/// Pages past the end yield an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
