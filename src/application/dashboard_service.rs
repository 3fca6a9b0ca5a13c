// Dashboard service - Aggregates catalog, orders and the order count into one view
use crate::application::catalog_provider::CatalogProvider;
use crate::application::credential_store::{CredentialStore, ACCESS_TOKEN_KEY};
use crate::application::order_count::{CountError, OrderCountSource};
use crate::application::view_state::ViewState;
use crate::domain::catalog::filter_products;
use crate::domain::dashboard::{total_spent, Dashboard, DashboardStats};
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    catalog: Arc<dyn CatalogProvider>,
    credentials: Arc<dyn CredentialStore>,
    counts: Arc<dyn OrderCountSource>,
    view: ViewState<Dashboard>,
}

impl DashboardService {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        credentials: Arc<dyn CredentialStore>,
        counts: Arc<dyn OrderCountSource>,
    ) -> Self {
        Self {
            catalog,
            credentials,
            counts,
            view: ViewState::new(Dashboard::default()),
        }
    }

    /// Run the three refreshes concurrently. Each one only touches its own
    /// part of the view, so a failure in one never holds back the others.
    pub async fn activate(&self) {
        tracing::info!("refreshing dashboard");
        futures::join!(
            self.refresh_products(),
            self.refresh_orders(),
            self.refresh_order_count(),
        );
    }

    pub fn set_search(&self, search: String) -> Dashboard {
        self.render(Some(search), None);
        self.snapshot()
    }

    pub fn snapshot(&self) -> Dashboard {
        self.view.get()
    }

    async fn refresh_products(&self) {
        if let Err(e) = self.catalog.refresh_stock().await {
            tracing::warn!(error = %e, "failed to refresh stock, keeping cached products");
        }
        self.render(None, None);
    }

    async fn refresh_orders(&self) {
        if let Err(e) = self.catalog.refresh_orders().await {
            tracing::warn!(error = %e, "failed to refresh orders, keeping cached orders");
        }
        self.render(None, None);
    }

    async fn refresh_order_count(&self) {
        match self.fetch_order_count().await {
            Ok(count) => {
                tracing::debug!(orders_placed = count, "fetched order count");
                self.render(None, Some(count));
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch total orders from count endpoint");
            }
        }
    }

    async fn fetch_order_count(&self) -> Result<u64, CountError> {
        let token = self
            .credentials
            .get(ACCESS_TOKEN_KEY)
            .ok_or(CountError::MissingToken)?;
        self.counts.orders_placed(&token).await
    }

    /// Rebuild the view from the current caches. The search string and the
    /// order count keep their previous values unless replaced here. The caches
    /// are read under the view lock so a slower render never overwrites a
    /// newer one with stale data.
    fn render(&self, search: Option<String>, total_orders: Option<u64>) {
        self.view.update(|current| {
            let products = self.catalog.products();
            let orders = self.catalog.orders();
            let search = search.unwrap_or_else(|| std::mem::take(&mut current.search));
            let stats = DashboardStats {
                total_orders: total_orders.unwrap_or(current.stats.total_orders),
                total_spent: total_spent(&orders),
            };
            let listing = filter_products(&products, &search);
            *current = Dashboard::new(search, stats, listing, orders);
        });
    }
}
