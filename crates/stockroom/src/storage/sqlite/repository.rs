//! SQLite repository implementation.
//!
//! Implements the repository traits from `stockroom_core::storage` using SQLite.

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use stockroom_core::retail::{Customer, InventoryItem, Invoice, Shop, Transfer};
use stockroom_core::storage::{
    CustomerRepository, InventoryRepository, InvoiceFilter, InvoiceRepository, RepositoryError,
    Result, ShopRepository, TimeWindow, TransferFilter, TransferRepository,
};

use super::conversions::{
    format_datetime, row_to_inventory_item, row_to_invoice, row_to_shop, row_to_transfer,
};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Splits an optional window into nullable bound parameters.
fn window_bounds(window: Option<&TimeWindow>) -> (Option<String>, Option<String>) {
    match window {
        Some(w) => (Some(format_datetime(&w.start)), Some(format_datetime(&w.end))),
        None => (None, None),
    }
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for all retail record types.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// ShopRepository implementation
// ============================================================================

#[async_trait]
impl ShopRepository for SqliteRepository {
    async fn get_shop(&self, id: Uuid) -> Result<Option<Shop>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_SHOP_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_shop) {
                    Ok(shop) => Ok(Some(shop)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Shop", id.to_string()))
    }

    async fn list_shops(&self, active_only: bool) -> Result<Vec<Shop>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_SHOPS).map_err(wrap_err)?;
                let rows = stmt
                    .query_map([active_only], row_to_shop)
                    .map_err(wrap_err)?;

                let mut shops = Vec::new();
                for row_result in rows {
                    shops.push(row_result.map_err(wrap_err)?);
                }
                Ok(shops)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Shop"))
    }

    async fn create_shop(&self, shop: &Shop) -> Result<()> {
        let id = shop.id.to_string();
        let name = shop.name.clone();
        let location = shop.location.clone();
        let active = shop.active;
        let created_at = format_datetime(&shop.created_at);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_SHOP,
                    rusqlite::params![id, name, location, active, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Shop", shop.id.to_string()))
    }
}

// ============================================================================
// CustomerRepository implementation
// ============================================================================

#[async_trait]
impl CustomerRepository for SqliteRepository {
    async fn count_customers(&self, shop_id: Option<Uuid>) -> Result<u64> {
        let shop = shop_id.map(|id| id.to_string());

        let count: i64 = self
            .conn
            .call(move |conn| {
                conn.query_row(schema::COUNT_CUSTOMERS, [shop], |row| row.get(0))
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Customer"))?;

        Ok(count.max(0) as u64)
    }

    async fn create_customer(&self, customer: &Customer) -> Result<()> {
        let id = customer.id.to_string();
        let shop_id = customer.shop_id.to_string();
        let name = customer.name.clone();
        let email = customer.email.clone();
        let created_at = format_datetime(&customer.created_at);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_CUSTOMER,
                    rusqlite::params![id, shop_id, name, email, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Customer", customer.id.to_string()))
    }
}

// ============================================================================
// InvoiceRepository implementation
// ============================================================================

#[async_trait]
impl InvoiceRepository for SqliteRepository {
    async fn list_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>> {
        let shop = filter.shop_id.map(|id| id.to_string());
        let (start, end) = window_bounds(filter.window.as_ref());

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_INVOICES).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params![shop, start, end], row_to_invoice)
                    .map_err(wrap_err)?;

                let mut invoices = Vec::new();
                for row_result in rows {
                    invoices.push(row_result.map_err(wrap_err)?);
                }
                Ok(invoices)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Invoice"))
    }

    async fn create_invoice(&self, invoice: &Invoice) -> Result<()> {
        let id = invoice.id.to_string();
        let shop_id = invoice.shop_id.to_string();
        let customer_id = invoice.customer_id.map(|id| id.to_string());
        let number = invoice.number.clone();
        let total = invoice.total;
        let amount_paid = invoice.amount_paid;
        let status = invoice.status.as_str();
        let issued_at = format_datetime(&invoice.issued_at);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_INVOICE,
                    rusqlite::params![
                        id,
                        shop_id,
                        customer_id,
                        number,
                        total,
                        amount_paid,
                        status,
                        issued_at
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Invoice", invoice.id.to_string()))
    }
}

// ============================================================================
// InventoryRepository implementation
// ============================================================================

#[async_trait]
impl InventoryRepository for SqliteRepository {
    async fn list_inventory(&self, shop_id: Option<Uuid>) -> Result<Vec<InventoryItem>> {
        let shop = shop_id.map(|id| id.to_string());

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_INVENTORY).map_err(wrap_err)?;
                let rows = stmt
                    .query_map([shop], row_to_inventory_item)
                    .map_err(wrap_err)?;

                let mut items = Vec::new();
                for row_result in rows {
                    items.push(row_result.map_err(wrap_err)?);
                }
                Ok(items)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "InventoryItem"))
    }

    async fn create_inventory_item(&self, item: &InventoryItem) -> Result<()> {
        let id = item.id.to_string();
        let shop_id = item.shop_id.to_string();
        let sku = item.sku.clone();
        let name = item.name.clone();
        let category = item.category.clone();
        let quantity = item.quantity;
        let cost_price = item.cost_price;
        let retail_price = item.retail_price;

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_INVENTORY_ITEM,
                    rusqlite::params![
                        id,
                        shop_id,
                        sku,
                        name,
                        category,
                        quantity,
                        cost_price,
                        retail_price
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "InventoryItem", item.id.to_string()))
    }
}

// ============================================================================
// TransferRepository implementation
// ============================================================================

#[async_trait]
impl TransferRepository for SqliteRepository {
    async fn list_transfers(&self, filter: &TransferFilter) -> Result<Vec<Transfer>> {
        let shop = filter.shop_id.map(|id| id.to_string());
        let (start, end) = window_bounds(filter.window.as_ref());
        // SQLite treats a negative LIMIT as "no limit".
        let limit = filter
            .limit
            .map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_TRANSFERS).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params![shop, start, end, limit], row_to_transfer)
                    .map_err(wrap_err)?;

                let mut transfers = Vec::new();
                for row_result in rows {
                    transfers.push(row_result.map_err(wrap_err)?);
                }
                Ok(transfers)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Transfer"))
    }

    async fn create_transfer(&self, transfer: &Transfer) -> Result<()> {
        let id = transfer.id.to_string();
        let from_shop_id = transfer.from_shop_id.to_string();
        let to_shop_id = transfer.to_shop_id.to_string();
        let item_name = transfer.item_name.clone();
        let quantity = transfer.quantity;
        let status = transfer.status.as_str();
        let created_at = format_datetime(&transfer.created_at);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_TRANSFER,
                    rusqlite::params![
                        id,
                        from_shop_id,
                        to_shop_id,
                        item_name,
                        quantity,
                        status,
                        created_at
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Transfer", transfer.id.to_string()))
    }
}
