//! Demo data seeding.
//!
//! Writes a generated [`SeedData`] set through the repository traits so every
//! storage backend is seeded the same way.

use stockroom_core::retail::SeedData;
use stockroom_core::storage::{Result, RetailStore};

/// Inserts every record of `data` into `store`.
///
/// Stops at the first failed write.
pub async fn seed_store<S>(store: &S, data: &SeedData) -> Result<()>
where
    S: RetailStore + ?Sized,
{
    for shop in &data.shops {
        store.create_shop(shop).await?;
    }
    for customer in &data.customers {
        store.create_customer(customer).await?;
    }
    for invoice in &data.invoices {
        store.create_invoice(invoice).await?;
    }
    for item in &data.items {
        store.create_inventory_item(item).await?;
    }
    for transfer in &data.transfers {
        store.create_transfer(transfer).await?;
    }

    tracing::info!(
        shops = data.shops.len(),
        customers = data.customers.len(),
        invoices = data.invoices.len(),
        items = data.items.len(),
        transfers = data.transfers.len(),
        "Seeded demo data"
    );
    Ok(())
}
