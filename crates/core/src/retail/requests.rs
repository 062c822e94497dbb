//! API request types for the write endpoints.
//!
//! Pure data plus validation; the server turns a validated request into a
//! record and hands it to the repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::RetailError;
use super::types::{InventoryItem, Invoice, InvoiceStatus, Transfer, TransferStatus};

/// Request payload for recording an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvoiceRequest {
    pub shop_id: Uuid,
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    pub number: String,
    pub total: f64,
    #[serde(default)]
    pub amount_paid: f64,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
}

impl CreateInvoiceRequest {
    /// Validates the request and converts it into an [`Invoice`].
    ///
    /// When no status is given it is derived from the payment: fully paid
    /// invoices are `Paid`, anything else `Pending`.
    pub fn into_invoice(self) -> Result<Invoice, RetailError> {
        if self.number.trim().is_empty() {
            return Err(RetailError::EmptyField("number"));
        }
        if self.total < 0.0 {
            return Err(RetailError::NegativeAmount {
                field: "total",
                value: self.total,
            });
        }
        if self.amount_paid < 0.0 {
            return Err(RetailError::NegativeAmount {
                field: "amount_paid",
                value: self.amount_paid,
            });
        }
        if self.amount_paid > self.total {
            return Err(RetailError::Overpaid {
                paid: self.amount_paid,
                total: self.total,
            });
        }

        let status = self.status.unwrap_or(if self.amount_paid >= self.total {
            InvoiceStatus::Paid
        } else {
            InvoiceStatus::Pending
        });

        let mut invoice = Invoice::new(self.shop_id, self.number.trim(), self.total)
            .with_amount_paid(self.amount_paid)
            .with_status(status);
        if let Some(customer_id) = self.customer_id {
            invoice = invoice.with_customer(customer_id);
        }
        if let Some(issued_at) = self.issued_at {
            invoice = invoice.with_issued_at(issued_at);
        }
        Ok(invoice)
    }
}

/// Request payload for moving stock between shops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransferRequest {
    pub from_shop_id: Uuid,
    pub to_shop_id: Uuid,
    pub item_name: String,
    pub quantity: i64,
    #[serde(default)]
    pub status: Option<TransferStatus>,
}

impl CreateTransferRequest {
    /// Validates the request and converts it into a [`Transfer`].
    pub fn into_transfer(self) -> Result<Transfer, RetailError> {
        if self.item_name.trim().is_empty() {
            return Err(RetailError::EmptyField("item_name"));
        }
        if self.from_shop_id == self.to_shop_id {
            return Err(RetailError::SameShopTransfer);
        }
        if self.quantity <= 0 {
            return Err(RetailError::InvalidQuantity);
        }

        Ok(Transfer::new(
            self.from_shop_id,
            self.to_shop_id,
            self.item_name.trim(),
            self.quantity,
        )
        .with_status(self.status.unwrap_or(TransferStatus::Pending)))
    }
}

/// Request payload for adding a stock line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInventoryItemRequest {
    pub shop_id: Uuid,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub cost_price: f64,
    pub retail_price: f64,
}

impl CreateInventoryItemRequest {
    /// Validates the request and converts it into an [`InventoryItem`].
    pub fn into_item(self) -> Result<InventoryItem, RetailError> {
        if self.sku.trim().is_empty() {
            return Err(RetailError::EmptyField("sku"));
        }
        if self.name.trim().is_empty() {
            return Err(RetailError::EmptyField("name"));
        }
        if self.cost_price < 0.0 {
            return Err(RetailError::NegativeAmount {
                field: "cost_price",
                value: self.cost_price,
            });
        }
        if self.retail_price < 0.0 {
            return Err(RetailError::NegativeAmount {
                field: "retail_price",
                value: self.retail_price,
            });
        }

        let category = if self.category.trim().is_empty() {
            "Uncategorized".to_string()
        } else {
            self.category.trim().to_string()
        };

        Ok(
            InventoryItem::new(self.shop_id, self.sku.trim(), self.name.trim(), category)
                .with_quantity(self.quantity)
                .with_prices(self.cost_price, self.retail_price),
        )
    }
}
