use async_trait::async_trait;
use uuid::Uuid;

use crate::retail::{Customer, InventoryItem, Invoice, Shop, Transfer};

use super::{InvoiceFilter, Result, TransferFilter};

/// Repository for shop operations.
#[async_trait]
pub trait ShopRepository: Send + Sync {
    /// Gets a shop by its ID.
    async fn get_shop(&self, id: Uuid) -> Result<Option<Shop>>;

    /// Lists shops ordered by name, optionally only the active ones.
    async fn list_shops(&self, active_only: bool) -> Result<Vec<Shop>>;

    /// Creates a new shop.
    async fn create_shop(&self, shop: &Shop) -> Result<()>;
}

/// Repository for customer operations.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Counts customers, optionally restricted to one shop.
    async fn count_customers(&self, shop_id: Option<Uuid>) -> Result<u64>;

    /// Creates a new customer.
    async fn create_customer(&self, customer: &Customer) -> Result<()>;
}

/// Repository for invoice operations.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Lists invoices matching the filter.
    async fn list_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>>;

    /// Creates a new invoice.
    async fn create_invoice(&self, invoice: &Invoice) -> Result<()>;
}

/// Repository for inventory operations.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Lists inventory lines, optionally restricted to one shop.
    async fn list_inventory(&self, shop_id: Option<Uuid>) -> Result<Vec<InventoryItem>>;

    /// Creates a new inventory line.
    async fn create_inventory_item(&self, item: &InventoryItem) -> Result<()>;
}

/// Repository for stock transfer operations.
#[async_trait]
pub trait TransferRepository: Send + Sync {
    /// Lists transfers newest first.
    ///
    /// A shop filter matches transfers where the shop is either the sender or
    /// the receiver.
    async fn list_transfers(&self, filter: &TransferFilter) -> Result<Vec<Transfer>>;

    /// Creates a new transfer.
    async fn create_transfer(&self, transfer: &Transfer) -> Result<()>;
}

/// Everything the dashboard aggregates over.
pub trait RetailStore:
    ShopRepository + CustomerRepository + InvoiceRepository + InventoryRepository + TransferRepository
{
}

impl<T> RetailStore for T where
    T: ShopRepository
        + CustomerRepository
        + InvoiceRepository
        + InventoryRepository
        + TransferRepository
{
}
