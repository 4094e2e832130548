//! Render-state selection and the screen view model.
//!
//! `RenderState::select` is the pure priority function the controller uses;
//! `Screen::compose` turns a state plus a snapshot of the store into the tree
//! the presentation layer draws. The `Display` impls are the terminal
//! rendering used by the `prodboard` shell.

use core::fmt;

use prodboard_core::ProductId;
use prodboard_products::{CreateProductDto, Product, SortCriterion};

use crate::loader::Loader;

/// Placeholder cards shown while the first fetch is in flight.
pub const SKELETON_CARD_COUNT: usize = 9;

/// Which top-level state the screen is in. First match wins, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderState {
    AuthResolving,
    Error(String),
    InitialLoading,
    Ready,
}

impl RenderState {
    pub fn select(auth_resolving: bool, error: Option<&str>, initial_loading: bool) -> Self {
        if auth_resolving {
            return RenderState::AuthResolving;
        }
        if let Some(message) = error {
            return RenderState::Error(message.to_string());
        }
        if initial_loading {
            RenderState::InitialLoading
        } else {
            RenderState::Ready
        }
    }
}

/// State of the store and modal, as needed to draw the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSnapshot {
    pub search_term: String,
    pub sort: SortCriterion,
    pub products: Vec<Product>,
    pub loading: bool,
    pub current_page: usize,
    pub total_pages: usize,
    pub modal: Option<ModalView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Auth still resolving: nothing but the overlay.
    Loader(Loader),
    /// Terminal error: the message and nothing else.
    Error(String),
    Dashboard(DashboardView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub header: HeaderView,
    pub body: GridView,
    /// Shown only for loads after the initial one.
    pub overlay: Option<Loader>,
    pub pagination: PaginationView,
    pub modal: Option<ModalView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub search_term: String,
    pub sort: SortCriterion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridView {
    Skeleton { cards: usize },
    Products(Vec<ProductCard>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub price: String,
    pub stock: u32,
    pub category: String,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            sku: product.sku.clone(),
            price: product.display_price(),
            stock: product.stock,
            category: product.category.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationView {
    pub current_page: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalView {
    Create,
    /// Edit form prefilled from the selected product.
    Edit(Product),
}

impl ModalView {
    /// Values the form starts with; a create form starts blank.
    pub fn initial_values(&self) -> Option<CreateProductDto> {
        match self {
            ModalView::Create => None,
            ModalView::Edit(product) => Some(CreateProductDto::from(product)),
        }
    }
}

impl Screen {
    pub fn compose(state: RenderState, snapshot: DashboardSnapshot) -> Self {
        let initial_loading = match state {
            RenderState::AuthResolving => return Screen::Loader(Loader),
            RenderState::Error(message) => return Screen::Error(message),
            RenderState::InitialLoading => true,
            RenderState::Ready => false,
        };

        let body = if initial_loading {
            GridView::Skeleton {
                cards: SKELETON_CARD_COUNT,
            }
        } else {
            GridView::Products(snapshot.products.iter().map(ProductCard::from).collect())
        };

        Screen::Dashboard(DashboardView {
            header: HeaderView {
                search_term: snapshot.search_term,
                sort: snapshot.sort,
            },
            body,
            overlay: (snapshot.loading && !initial_loading).then_some(Loader),
            pagination: PaginationView {
                current_page: snapshot.current_page,
                total_pages: snapshot.total_pages,
            },
            modal: snapshot.modal,
        })
    }

    pub fn as_dashboard(&self) -> Option<&DashboardView> {
        match self {
            Screen::Dashboard(view) => Some(view),
            _ => None,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Loader(loader) => write!(f, "{loader}"),
            Screen::Error(message) => write!(f, "Error: {message}"),
            Screen::Dashboard(view) => write!(f, "{view}"),
        }
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "{}", self.body)?;
        if let Some(loader) = &self.overlay {
            writeln!(f, "{loader}")?;
        }
        write!(f, "{}", self.pagination)?;
        if let Some(modal) = &self.modal {
            write!(f, "\n{modal}")?;
        }
        Ok(())
    }
}

impl fmt::Display for HeaderView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "== Products == search: {:?} | sort: {} | [new] [logout]", self.search_term, self.sort)
    }
}

impl fmt::Display for GridView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridView::Skeleton { cards } => {
                for i in 0..*cards {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "[ .......... ]")?;
                }
                Ok(())
            }
            GridView::Products(cards) if cards.is_empty() => write!(f, "No products found."),
            GridView::Products(cards) => {
                for (i, card) in cards.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{card}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for ProductCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:<4} {:<24} {:<10} {:>14}  stock {:<5} {}",
            self.id, self.name, self.sku, self.price, self.stock, self.category
        )
    }
}

impl fmt::Display for PaginationView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page {} of {}", self.current_page, self.total_pages)
    }
}

impl fmt::Display for ModalView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModalView::Create => write!(f, "--- New product --- (save name=... sku=... price=... | cancel)"),
            ModalView::Edit(product) => {
                writeln!(f, "--- Edit product #{} --- (save field=value ... | cancel)", product.id)?;
                writeln!(f, "  name:        {}", product.name)?;
                writeln!(f, "  sku:         {}", product.sku)?;
                writeln!(f, "  price:       {}", product.display_price())?;
                writeln!(f, "  stock:       {}", product.stock)?;
                writeln!(f, "  category:    {}", product.category)?;
                write!(f, "  description: {}", product.description)
            }
        }
    }
}
