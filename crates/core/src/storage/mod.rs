mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{DateRangeError, RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use traits::{
    CustomerRepository, InventoryRepository, InvoiceRepository, RetailStore, ShopRepository,
    TransferRepository,
};
pub use types::{end_of_day, start_of_day, InvoiceFilter, PeriodPreset, TimeWindow, TransferFilter};
