//! Cache-busting repository decorator.
//!
//! Wraps any [`RetailStore`] so that every successful write invalidates the
//! dashboard entries it could have made stale. Reads pass straight through;
//! the dashboard caches aggregates, not records.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use stockroom_core::cache::scope_pattern;
use stockroom_core::dashboard::Scope;
use stockroom_core::retail::{Customer, InventoryItem, Invoice, Shop, Transfer};
use stockroom_core::storage::{
    CustomerRepository, InventoryRepository, InvoiceFilter, InvoiceRepository, Result,
    RetailStore, ShopRepository, TransferFilter, TransferRepository,
};

use crate::cache::KeyValueCache;

/// Repository decorator that busts dashboard cache entries after writes.
///
/// A write touching shop `S` removes every key under scope `S` and every key
/// under the global scope, which aggregates across all shops. Cache failures
/// never fail the write.
///
/// # Type Parameters
///
/// * `R` - The underlying repository implementation
pub struct InvalidatingStore<R>
where
    R: RetailStore,
{
    repository: Arc<R>,
    cache: KeyValueCache,
}

impl<R> InvalidatingStore<R>
where
    R: RetailStore,
{
    /// Creates a new invalidating store.
    pub fn new(repository: Arc<R>, cache: KeyValueCache) -> Self {
        Self { repository, cache }
    }

    /// Invalidates the global scope plus each given shop scope.
    async fn invalidate(&self, shops: &[Uuid]) -> u64 {
        let mut removed = self.cache.invalidate_pattern(&scope_pattern(&Scope::Global)).await;
        for shop_id in shops {
            removed += self
                .cache
                .invalidate_pattern(&scope_pattern(&Scope::Shop(*shop_id)))
                .await;
        }
        tracing::debug!(shops = shops.len(), removed, "Dashboard cache invalidated after write");
        removed
    }
}

#[async_trait]
impl<R> ShopRepository for InvalidatingStore<R>
where
    R: RetailStore + 'static,
{
    async fn get_shop(&self, id: Uuid) -> Result<Option<Shop>> {
        self.repository.get_shop(id).await
    }

    async fn list_shops(&self, active_only: bool) -> Result<Vec<Shop>> {
        self.repository.list_shops(active_only).await
    }

    async fn create_shop(&self, shop: &Shop) -> Result<()> {
        self.repository.create_shop(shop).await?;
        self.invalidate(&[shop.id]).await;
        Ok(())
    }
}

#[async_trait]
impl<R> CustomerRepository for InvalidatingStore<R>
where
    R: RetailStore + 'static,
{
    async fn count_customers(&self, shop_id: Option<Uuid>) -> Result<u64> {
        self.repository.count_customers(shop_id).await
    }

    async fn create_customer(&self, customer: &Customer) -> Result<()> {
        self.repository.create_customer(customer).await?;
        self.invalidate(&[customer.shop_id]).await;
        Ok(())
    }
}

#[async_trait]
impl<R> InvoiceRepository for InvalidatingStore<R>
where
    R: RetailStore + 'static,
{
    async fn list_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>> {
        self.repository.list_invoices(filter).await
    }

    async fn create_invoice(&self, invoice: &Invoice) -> Result<()> {
        self.repository.create_invoice(invoice).await?;
        self.invalidate(&[invoice.shop_id]).await;
        Ok(())
    }
}

#[async_trait]
impl<R> InventoryRepository for InvalidatingStore<R>
where
    R: RetailStore + 'static,
{
    async fn list_inventory(&self, shop_id: Option<Uuid>) -> Result<Vec<InventoryItem>> {
        self.repository.list_inventory(shop_id).await
    }

    async fn create_inventory_item(&self, item: &InventoryItem) -> Result<()> {
        self.repository.create_inventory_item(item).await?;
        self.invalidate(&[item.shop_id]).await;
        Ok(())
    }
}

#[async_trait]
impl<R> TransferRepository for InvalidatingStore<R>
where
    R: RetailStore + 'static,
{
    async fn list_transfers(&self, filter: &TransferFilter) -> Result<Vec<Transfer>> {
        self.repository.list_transfers(filter).await
    }

    async fn create_transfer(&self, transfer: &Transfer) -> Result<()> {
        self.repository.create_transfer(transfer).await?;
        self.invalidate(&[transfer.from_shop_id, transfer.to_shop_id])
            .await;
        Ok(())
    }
}
