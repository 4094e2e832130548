//! Page controller for the products dashboard.
//!
//! Sequences the screen lifecycle (auth resolution, the one-time initial
//! load), turns user intents into store calls, and selects what to render.
//! The controller itself owns only the modal/selection and the load phase;
//! everything list-related lives in [`ProductsStore`].

use thiserror::Error;

use prodboard_auth::{AuthGuard, LocalStorage, StorageError};
use prodboard_core::ProductId;
use prodboard_products::{CreateProductDto, Product, SortCriterion};

use crate::api::ProductsApi;
use crate::capabilities::{Confirm, Navigator};
use crate::render::{DashboardSnapshot, ModalView, RenderState, Screen};
use crate::store::ProductsStore;

/// Route logout sends the user to.
pub const ROOT_ROUTE: &str = "/";

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this product?";

/// Whether the first fetch has settled yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Initial,
    /// Terminal: never goes back to `Initial`.
    Settled,
}

/// Create/edit modal. A selection only exists while the modal is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Closed,
    Open { selected: Option<Product> },
}

#[derive(Debug, Error)]
pub enum LogoutError {
    #[error("failed to clear auth marker: {0}")]
    ClearMarker(#[from] StorageError),
}

pub struct ProductsController<A, S, C, N> {
    store: ProductsStore<A>,
    auth: AuthGuard<S>,
    confirm: C,
    navigator: N,
    phase: LoadPhase,
    mount_started: bool,
    modal: Modal,
}

impl<A, S, C, N> ProductsController<A, S, C, N>
where
    A: ProductsApi,
    S: LocalStorage,
    C: Confirm,
    N: Navigator,
{
    pub fn new(store: ProductsStore<A>, auth: AuthGuard<S>, confirm: C, navigator: N) -> Self {
        Self {
            store,
            auth,
            confirm,
            navigator,
            phase: LoadPhase::Initial,
            mount_started: false,
            modal: Modal::Closed,
        }
    }

    pub fn store(&self) -> &ProductsStore<A> {
        &self.store
    }

    pub fn auth(&self) -> &AuthGuard<S> {
        &self.auth
    }

    /// Used by the login page to sign in before the dashboard is shown again.
    pub fn auth_mut(&mut self) -> &mut AuthGuard<S> {
        &mut self.auth
    }

    pub fn confirm(&self) -> &C {
        &self.confirm
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    pub fn load_phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_initial_loading(&self) -> bool {
        self.phase == LoadPhase::Initial
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn is_modal_open(&self) -> bool {
        matches!(self.modal, Modal::Open { .. })
    }

    pub fn selected(&self) -> Option<&Product> {
        match &self.modal {
            Modal::Open { selected } => selected.as_ref(),
            Modal::Closed => None,
        }
    }

    /// First render: resolve auth, fetch everything once, settle the load phase.
    ///
    /// Later calls are no-ops. A failed fetch still settles the phase; the
    /// failure shows up through the store's error.
    pub async fn mount(&mut self) {
        if self.mount_started {
            tracing::debug!("dashboard already mounted; skipping initial load");
            return;
        }
        self.mount_started = true;

        self.auth.resolve().await;
        self.store.fetch_all().await;
        self.phase = LoadPhase::Settled;
        tracing::info!("initial load settled");
    }

    /// Update the selected product, or create one when nothing is selected.
    pub async fn save(&mut self, dto: CreateProductDto) {
        match self.selected().map(|p| p.id) {
            Some(id) => {
                tracing::info!("saving changes to product {}", id);
                self.store.update(id, dto.into()).await;
            }
            None => {
                tracing::info!("saving new product {}", dto.sku);
                self.store.create(dto).await;
            }
        }
    }

    pub fn edit(&mut self, product: Product) {
        tracing::debug!("editing product {}", product.id);
        self.modal = Modal::Open {
            selected: Some(product),
        };
    }

    /// Header "new" action: open the modal with nothing selected.
    pub fn open_create(&mut self) {
        self.modal = Modal::Open { selected: None };
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
    }

    /// Delete after the user confirms; declining changes nothing.
    pub async fn delete(&mut self, id: ProductId) {
        if !self.confirm.confirm(DELETE_CONFIRMATION) {
            tracing::debug!("delete of product {} declined", id);
            return;
        }
        self.store.delete(id).await;
    }

    /// Clear the auth marker, then go to the root route.
    ///
    /// If the marker cannot be cleared the error is logged and returned, and
    /// no navigation happens.
    pub async fn logout(&mut self) -> Result<(), LogoutError> {
        if let Err(err) = self.auth.sign_out().await {
            tracing::error!("logout failed: {err:?}");
            return Err(err.into());
        }
        self.navigator.navigate(ROOT_ROUTE);
        Ok(())
    }

    pub fn search(&mut self, term: impl Into<String>) {
        self.store.search(term);
    }

    pub fn sort(&mut self, criterion: SortCriterion) {
        self.store.sort(criterion);
    }

    pub fn change_page(&mut self, page: usize) {
        self.store.change_page(page);
    }

    pub fn render_state(&self) -> RenderState {
        let error = self.store.error().map(|e| e.to_string());
        RenderState::select(
            self.auth.is_resolving(),
            error.as_deref(),
            self.is_initial_loading(),
        )
    }

    /// The open form, if any: blank for create, prefilled for edit.
    pub fn modal_view(&self) -> Option<ModalView> {
        match &self.modal {
            Modal::Closed => None,
            Modal::Open { selected: None } => Some(ModalView::Create),
            Modal::Open {
                selected: Some(product),
            } => Some(ModalView::Edit(product.clone())),
        }
    }

    pub fn view(&self) -> Screen {
        let state = self.render_state();
        let modal = self.modal_view();
        let snapshot = DashboardSnapshot {
            search_term: self.store.search_term().to_string(),
            sort: self.store.sort_criterion(),
            products: self.store.visible_products(),
            loading: self.store.loading(),
            current_page: self.store.current_page(),
            total_pages: self.store.total_pages(),
            modal,
        };
        Screen::compose(state, snapshot)
    }
}
