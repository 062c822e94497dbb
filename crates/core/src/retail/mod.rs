mod error;
mod mock_data;
mod requests;
mod types;

pub use error::RetailError;
pub use mock_data::{generate_seed_data, SeedData};
pub use requests::{CreateInventoryItemRequest, CreateInvoiceRequest, CreateTransferRequest};
pub use types::{
    Customer, InventoryItem, Invoice, InvoiceStatus, Shop, Transfer, TransferStatus,
};
