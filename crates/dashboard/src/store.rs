//! Products data store: the list/query state behind the dashboard.
//!
//! Holds what the API last returned plus the user's view of it (search term,
//! sort, page). Network-backed operations flip `loading` around the call and
//! record failures in `error` instead of returning them; the controller reads
//! that state to decide what to render.

use prodboard_core::ProductId;
use prodboard_products::{
    CreateProductDto, Product, SortCriterion, UpdateProductDto, matches_search, paginate,
    sort_products, total_pages,
};

use crate::api::{ApiError, ProductsApi};

/// Cards per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 8;

#[derive(Debug)]
pub struct ProductsStore<A> {
    api: A,
    products: Vec<Product>,
    search_term: String,
    sort: SortCriterion,
    current_page: usize,
    page_size: usize,
    loading: bool,
    error: Option<ApiError>,
}

impl<A: ProductsApi> ProductsStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            products: Vec::new(),
            search_term: String::new(),
            sort: SortCriterion::default(),
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            loading: false,
            error: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort_criterion(&self) -> SortCriterion {
        self.sort
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_count(), self.page_size)
    }

    /// Every fetched product, in API order.
    pub fn all_products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn filtered_count(&self) -> usize {
        self.products
            .iter()
            .filter(|p| matches_search(p, &self.search_term))
            .count()
    }

    /// Products matching the search term, sorted by the active criterion.
    pub fn filtered_products(&self) -> Vec<Product> {
        let mut filtered: Vec<Product> = self
            .products
            .iter()
            .filter(|p| matches_search(p, &self.search_term))
            .cloned()
            .collect();
        sort_products(&mut filtered, self.sort);
        filtered
    }

    /// The slice of `filtered_products` shown on the current page.
    pub fn visible_products(&self) -> Vec<Product> {
        paginate(&self.filtered_products(), self.current_page, self.page_size).to_vec()
    }

    /// Load the full catalog.
    pub async fn fetch_all(&mut self) {
        self.loading = true;
        match self.api.list().await {
            Ok(products) => {
                tracing::info!("fetched {} products", products.len());
                self.products = products;
                let total = self.total_pages();
                self.current_page = self.current_page.clamp(1, total);
                self.loading = false;
            }
            Err(err) => self.record_failure("fetch products", err),
        }
    }

    /// Filter the loaded list; no network call. Resets to the first page.
    pub fn search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.current_page = 1;
        tracing::debug!("search term set to {:?}", self.search_term);
    }

    pub fn sort(&mut self, criterion: SortCriterion) {
        self.sort = criterion;
        tracing::debug!("sort criterion set to {}", criterion);
    }

    /// Jump to a 1-based page; pages outside `1..=total_pages` are ignored.
    pub fn change_page(&mut self, page: usize) {
        let total = self.total_pages();
        if page == 0 || page > total {
            tracing::debug!("ignoring page change to {} (total pages: {})", page, total);
            return;
        }
        self.current_page = page;
    }

    pub async fn create(&mut self, dto: CreateProductDto) {
        self.loading = true;
        match self.api.create(&dto).await {
            Ok(product) => {
                tracing::info!("created product {} ({})", product.id, product.sku);
                self.fetch_all().await;
            }
            Err(err) => self.record_failure("create product", err),
        }
    }

    pub async fn update(&mut self, id: ProductId, dto: UpdateProductDto) {
        self.loading = true;
        match self.api.update(id, &dto).await {
            Ok(product) => {
                tracing::info!("updated product {} ({})", product.id, product.sku);
                self.fetch_all().await;
            }
            Err(err) => self.record_failure("update product", err),
        }
    }

    pub async fn delete(&mut self, id: ProductId) {
        self.loading = true;
        match self.api.delete(id).await {
            Ok(()) => {
                tracing::info!("deleted product {}", id);
                self.fetch_all().await;
            }
            Err(err) => self.record_failure("delete product", err),
        }
    }

    fn record_failure(&mut self, action: &str, err: ApiError) {
        tracing::error!("failed to {action}: {err:?}");
        self.error = Some(err);
        self.loading = false;
    }
}
