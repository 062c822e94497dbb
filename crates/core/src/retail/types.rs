use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical shop. Each active shop is a dashboard partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Shop {
    /// Creates a new active shop.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            location: None,
            active: true,
            created_at: Utc::now(),
        }
    }

    /// Sets the location for this shop.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Marks the shop as inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Sets a specific ID for this shop (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// A customer registered at a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Creates a new customer for the given shop.
    pub fn new(shop_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            shop_id,
            name: name.into(),
            email: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the email for this customer.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets a specific ID for this customer (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Payment state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    /// Returns true if the invoice still has a balance to collect.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, InvoiceStatus::Pending | InvoiceStatus::Overdue)
    }

    /// Returns the storage representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    /// Parses the storage representation of a status.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "paid" => Some(InvoiceStatus::Paid),
            "pending" => Some(InvoiceStatus::Pending),
            "overdue" => Some(InvoiceStatus::Overdue),
            "cancelled" => Some(InvoiceStatus::Cancelled),
            _ => None,
        }
    }
}

/// A sales invoice issued by a shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub number: String,
    pub total: f64,
    pub amount_paid: f64,
    pub status: InvoiceStatus,
    pub issued_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates a new pending invoice issued now.
    pub fn new(shop_id: Uuid, number: impl Into<String>, total: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            shop_id,
            customer_id: None,
            number: number.into(),
            total,
            amount_paid: 0.0,
            status: InvoiceStatus::Pending,
            issued_at: Utc::now(),
        }
    }

    /// Sets the customer this invoice was issued to.
    pub fn with_customer(mut self, customer_id: Uuid) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Sets the status of this invoice.
    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the amount paid so far.
    pub fn with_amount_paid(mut self, amount_paid: f64) -> Self {
        self.amount_paid = amount_paid;
        self
    }

    /// Marks the invoice as fully paid.
    pub fn paid(self) -> Self {
        let total = self.total;
        self.with_amount_paid(total).with_status(InvoiceStatus::Paid)
    }

    /// Sets the issue timestamp.
    pub fn with_issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = issued_at;
        self
    }

    /// Sets a specific ID for this invoice (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Remaining balance, zero for settled or cancelled invoices.
    pub fn outstanding_balance(&self) -> f64 {
        if self.status.is_outstanding() {
            (self.total - self.amount_paid).max(0.0)
        } else {
            0.0
        }
    }

    /// Revenue recognised for this invoice. Cancelled invoices count for nothing.
    pub fn revenue(&self) -> f64 {
        match self.status {
            InvoiceStatus::Cancelled => 0.0,
            _ => self.total,
        }
    }
}

/// A stock line held by a shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub cost_price: f64,
    pub retail_price: f64,
}

impl InventoryItem {
    /// Creates a new inventory line.
    pub fn new(
        shop_id: Uuid,
        sku: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            shop_id,
            sku: sku.into(),
            name: name.into(),
            category: category.into(),
            quantity: 0,
            cost_price: 0.0,
            retail_price: 0.0,
        }
    }

    /// Sets the quantity on hand.
    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the unit cost and retail prices.
    pub fn with_prices(mut self, cost_price: f64, retail_price: f64) -> Self {
        self.cost_price = cost_price;
        self.retail_price = retail_price;
        self
    }

    /// Sets a specific ID for this item (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Stock value at cost. Negative quantities (backorders) count as zero.
    pub fn cost_value(&self) -> f64 {
        self.quantity.max(0) as f64 * self.cost_price
    }

    /// Stock value at retail price.
    pub fn retail_value(&self) -> f64 {
        self.quantity.max(0) as f64 * self.retail_price
    }
}

/// Lifecycle state of a stock transfer between shops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    Pending,
    InTransit,
    Completed,
    Cancelled,
}

impl TransferStatus {
    /// Returns the storage representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "pending",
            TransferStatus::InTransit => "in_transit",
            TransferStatus::Completed => "completed",
            TransferStatus::Cancelled => "cancelled",
        }
    }

    /// Parses the storage representation of a status.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(TransferStatus::Pending),
            "in_transit" => Some(TransferStatus::InTransit),
            "completed" => Some(TransferStatus::Completed),
            "cancelled" => Some(TransferStatus::Cancelled),
            _ => None,
        }
    }
}

/// Stock moved from one shop to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: Uuid,
    pub from_shop_id: Uuid,
    pub to_shop_id: Uuid,
    pub item_name: String,
    pub quantity: i64,
    pub status: TransferStatus,
    pub created_at: DateTime<Utc>,
}

impl Transfer {
    /// Creates a new pending transfer created now.
    pub fn new(
        from_shop_id: Uuid,
        to_shop_id: Uuid,
        item_name: impl Into<String>,
        quantity: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_shop_id,
            to_shop_id,
            item_name: item_name.into(),
            quantity,
            status: TransferStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Sets the status of this transfer.
    pub fn with_status(mut self, status: TransferStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Sets a specific ID for this transfer (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Returns true if the transfer touches the given shop on either side.
    pub fn involves(&self, shop_id: Uuid) -> bool {
        self.from_shop_id == shop_id || self.to_shop_id == shop_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outstanding_balance_by_status() {
        let shop = Uuid::new_v4();
        let pending = Invoice::new(shop, "INV-1", 100.0).with_amount_paid(40.0);
        let overdue = Invoice::new(shop, "INV-2", 80.0).with_status(InvoiceStatus::Overdue);
        let paid = Invoice::new(shop, "INV-3", 50.0).paid();
        let cancelled = Invoice::new(shop, "INV-4", 70.0).with_status(InvoiceStatus::Cancelled);

        assert_eq!(pending.outstanding_balance(), 60.0);
        assert_eq!(overdue.outstanding_balance(), 80.0);
        assert_eq!(paid.outstanding_balance(), 0.0);
        assert_eq!(cancelled.outstanding_balance(), 0.0);
    }

    #[test]
    fn test_revenue_excludes_cancelled() {
        let shop = Uuid::new_v4();
        assert_eq!(Invoice::new(shop, "A", 10.0).revenue(), 10.0);
        assert_eq!(
            Invoice::new(shop, "B", 10.0)
                .with_status(InvoiceStatus::Cancelled)
                .revenue(),
            0.0
        );
    }

    #[test]
    fn test_inventory_values_ignore_backorders() {
        let shop = Uuid::new_v4();
        let item = InventoryItem::new(shop, "SKU-1", "Kettle", "Kitchen")
            .with_quantity(4)
            .with_prices(10.0, 25.0);
        assert_eq!(item.cost_value(), 40.0);
        assert_eq!(item.retail_value(), 100.0);

        let backorder = item.clone().with_quantity(-3);
        assert_eq!(backorder.cost_value(), 0.0);
        assert_eq!(backorder.retail_value(), 0.0);
    }

    #[test]
    fn test_status_string_roundtrip() {
        for status in [
            InvoiceStatus::Paid,
            InvoiceStatus::Pending,
            InvoiceStatus::Overdue,
            InvoiceStatus::Cancelled,
        ] {
            assert_eq!(InvoiceStatus::parse(status.as_str()), Some(status));
        }
        for status in [
            TransferStatus::Pending,
            TransferStatus::InTransit,
            TransferStatus::Completed,
            TransferStatus::Cancelled,
        ] {
            assert_eq!(TransferStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(InvoiceStatus::parse("refunded"), None);
    }

    #[test]
    fn test_transfer_involves() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let transfer = Transfer::new(a, b, "Chairs", 5);
        assert!(transfer.involves(a));
        assert!(transfer.involves(b));
        assert!(!transfer.involves(Uuid::new_v4()));
    }
}
