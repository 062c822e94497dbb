//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use stockroom_core::retail::{Customer, InventoryItem, Invoice, Shop, Transfer};
use stockroom_core::storage::{
    CustomerRepository, InventoryRepository, InvoiceFilter, InvoiceRepository, RepositoryError,
    Result, ShopRepository, TransferFilter, TransferRepository,
};

/// In-memory storage backend.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    shops: Arc<RwLock<HashMap<Uuid, Shop>>>,
    customers: Arc<RwLock<HashMap<Uuid, Customer>>>,
    invoices: Arc<RwLock<HashMap<Uuid, Invoice>>>,
    items: Arc<RwLock<HashMap<Uuid, InventoryItem>>>,
    transfers: Arc<RwLock<HashMap<Uuid, Transfer>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn insert_new<T: Clone>(
    map: &mut HashMap<Uuid, T>,
    id: Uuid,
    value: &T,
    entity_type: &'static str,
) -> Result<()> {
    if map.contains_key(&id) {
        return Err(RepositoryError::AlreadyExists {
            entity_type,
            id: id.to_string(),
        });
    }
    map.insert(id, value.clone());
    Ok(())
}

#[async_trait]
impl ShopRepository for InMemoryRepository {
    async fn get_shop(&self, id: Uuid) -> Result<Option<Shop>> {
        let shops = self.shops.read().await;
        Ok(shops.get(&id).cloned())
    }

    async fn list_shops(&self, active_only: bool) -> Result<Vec<Shop>> {
        let shops = self.shops.read().await;
        let mut list: Vec<Shop> = shops
            .values()
            .filter(|shop| !active_only || shop.active)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    async fn create_shop(&self, shop: &Shop) -> Result<()> {
        let mut shops = self.shops.write().await;
        insert_new(&mut shops, shop.id, shop, "Shop")
    }
}

#[async_trait]
impl CustomerRepository for InMemoryRepository {
    async fn count_customers(&self, shop_id: Option<Uuid>) -> Result<u64> {
        let customers = self.customers.read().await;
        Ok(customers
            .values()
            .filter(|c| shop_id.is_none_or(|id| c.shop_id == id))
            .count() as u64)
    }

    async fn create_customer(&self, customer: &Customer) -> Result<()> {
        let mut customers = self.customers.write().await;
        insert_new(&mut customers, customer.id, customer, "Customer")
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryRepository {
    async fn list_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>> {
        let invoices = self.invoices.read().await;
        let mut list: Vec<Invoice> = invoices
            .values()
            .filter(|i| filter.matches(i.shop_id, i.issued_at))
            .cloned()
            .collect();
        list.sort_by(|a, b| a.issued_at.cmp(&b.issued_at));
        Ok(list)
    }

    async fn create_invoice(&self, invoice: &Invoice) -> Result<()> {
        let mut invoices = self.invoices.write().await;
        insert_new(&mut invoices, invoice.id, invoice, "Invoice")
    }
}

#[async_trait]
impl InventoryRepository for InMemoryRepository {
    async fn list_inventory(&self, shop_id: Option<Uuid>) -> Result<Vec<InventoryItem>> {
        let items = self.items.read().await;
        let mut list: Vec<InventoryItem> = items
            .values()
            .filter(|item| shop_id.is_none_or(|id| item.shop_id == id))
            .cloned()
            .collect();
        list.sort_by(|a, b| a.sku.cmp(&b.sku));
        Ok(list)
    }

    async fn create_inventory_item(&self, item: &InventoryItem) -> Result<()> {
        let mut items = self.items.write().await;
        insert_new(&mut items, item.id, item, "InventoryItem")
    }
}

#[async_trait]
impl TransferRepository for InMemoryRepository {
    async fn list_transfers(&self, filter: &TransferFilter) -> Result<Vec<Transfer>> {
        let transfers = self.transfers.read().await;
        let mut list: Vec<Transfer> = transfers
            .values()
            .filter(|t| filter.shop_id.is_none_or(|id| t.involves(id)))
            .filter(|t| filter.window.is_none_or(|w| w.contains(t.created_at)))
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = filter.limit {
            list.truncate(limit);
        }
        Ok(list)
    }

    async fn create_transfer(&self, transfer: &Transfer) -> Result<()> {
        let mut transfers = self.transfers.write().await;
        insert_new(&mut transfers, transfer.id, transfer, "Transfer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use stockroom_core::storage::TimeWindow;

    fn at(y: i32, m: u32, d: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_shop() {
        let repo = InMemoryRepository::new();
        let shop = Shop::new("Harbour Street");

        repo.create_shop(&shop).await.unwrap();

        assert_eq!(repo.get_shop(shop.id).await.unwrap(), Some(shop));
        assert_eq!(repo.get_shop(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_shop_is_rejected() {
        let repo = InMemoryRepository::new();
        let shop = Shop::new("Harbour Street");
        repo.create_shop(&shop).await.unwrap();

        let result = repo.create_shop(&shop).await;
        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists {
                entity_type: "Shop",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_list_shops_active_only() {
        let repo = InMemoryRepository::new();
        repo.create_shop(&Shop::new("B")).await.unwrap();
        repo.create_shop(&Shop::new("A")).await.unwrap();
        repo.create_shop(&Shop::new("C").inactive()).await.unwrap();

        let active = repo.list_shops(true).await.unwrap();
        let names: Vec<&str> = active.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(repo.list_shops(false).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_count_customers_by_shop() {
        let repo = InMemoryRepository::new();
        let shop = Uuid::new_v4();
        repo.create_customer(&Customer::new(shop, "Ada")).await.unwrap();
        repo.create_customer(&Customer::new(shop, "Bo")).await.unwrap();
        repo.create_customer(&Customer::new(Uuid::new_v4(), "Cleo"))
            .await
            .unwrap();

        assert_eq!(repo.count_customers(Some(shop)).await.unwrap(), 2);
        assert_eq!(repo.count_customers(None).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_list_invoices_by_window() {
        let repo = InMemoryRepository::new();
        let shop = Uuid::new_v4();
        repo.create_invoice(&Invoice::new(shop, "1", 100.0).with_issued_at(at(2024, 1, 10)))
            .await
            .unwrap();
        repo.create_invoice(&Invoice::new(shop, "2", 200.0).with_issued_at(at(2024, 1, 31)))
            .await
            .unwrap();
        repo.create_invoice(&Invoice::new(shop, "3", 400.0).with_issued_at(at(2024, 2, 1)))
            .await
            .unwrap();

        let window = TimeWindow::from_dates(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();
        let invoices = repo
            .list_invoices(&InvoiceFilter {
                shop_id: Some(shop),
                window: Some(window),
            })
            .await
            .unwrap();

        let numbers: Vec<&str> = invoices.iter().map(|i| i.number.as_str()).collect();
        assert_eq!(numbers, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_list_transfers_matches_either_side() {
        let repo = InMemoryRepository::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        repo.create_transfer(&Transfer::new(a, b, "Lamps", 1).with_created_at(at(2024, 1, 1)))
            .await
            .unwrap();
        repo.create_transfer(&Transfer::new(c, a, "Rugs", 1).with_created_at(at(2024, 1, 2)))
            .await
            .unwrap();
        repo.create_transfer(&Transfer::new(b, c, "Mugs", 1).with_created_at(at(2024, 1, 3)))
            .await
            .unwrap();

        let transfers = repo
            .list_transfers(&TransferFilter {
                shop_id: Some(a),
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<&str> = transfers.iter().map(|t| t.item_name.as_str()).collect();
        assert_eq!(names, vec!["Rugs", "Lamps"]);

        let limited = repo
            .list_transfers(&TransferFilter {
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].item_name, "Mugs");
    }

    #[tokio::test]
    async fn test_list_inventory_by_shop() {
        let repo = InMemoryRepository::new();
        let shop = Uuid::new_v4();
        repo.create_inventory_item(&InventoryItem::new(shop, "A-1", "Lamp", "Lighting"))
            .await
            .unwrap();
        repo.create_inventory_item(&InventoryItem::new(Uuid::new_v4(), "B-1", "Rug", "Textiles"))
            .await
            .unwrap();

        assert_eq!(repo.list_inventory(Some(shop)).await.unwrap().len(), 1);
        assert_eq!(repo.list_inventory(None).await.unwrap().len(), 2);
    }
}
