//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use uuid::Uuid;

use stockroom_core::retail::{
    InventoryItem, Invoice, InvoiceStatus, Shop, Transfer, TransferStatus,
};

/// Convert a SQLite row to a Shop.
///
/// Expected columns: id, name, location, active, created_at
pub fn row_to_shop(row: &Row) -> rusqlite::Result<Shop> {
    let id: String = row.get(0)?;
    let active: i64 = row.get(3)?;
    let created_at: String = row.get(4)?;

    Ok(Shop {
        id: parse_uuid(&id)?,
        name: row.get(1)?,
        location: row.get(2)?,
        active: active != 0,
        created_at: parse_datetime(&created_at)?,
    })
}

/// Convert a SQLite row to an Invoice.
///
/// Expected columns: id, shop_id, customer_id, number, total, amount_paid, status, issued_at
pub fn row_to_invoice(row: &Row) -> rusqlite::Result<Invoice> {
    let id: String = row.get(0)?;
    let shop_id: String = row.get(1)?;
    let customer_id: Option<String> = row.get(2)?;
    let status: String = row.get(6)?;
    let issued_at: String = row.get(7)?;

    Ok(Invoice {
        id: parse_uuid(&id)?,
        shop_id: parse_uuid(&shop_id)?,
        customer_id: customer_id.as_deref().map(parse_uuid).transpose()?,
        number: row.get(3)?,
        total: row.get(4)?,
        amount_paid: row.get(5)?,
        status: InvoiceStatus::parse(&status).ok_or_else(|| invalid_text("invoice status", &status))?,
        issued_at: parse_datetime(&issued_at)?,
    })
}

/// Convert a SQLite row to an InventoryItem.
///
/// Expected columns: id, shop_id, sku, name, category, quantity, cost_price, retail_price
pub fn row_to_inventory_item(row: &Row) -> rusqlite::Result<InventoryItem> {
    let id: String = row.get(0)?;
    let shop_id: String = row.get(1)?;

    Ok(InventoryItem {
        id: parse_uuid(&id)?,
        shop_id: parse_uuid(&shop_id)?,
        sku: row.get(2)?,
        name: row.get(3)?,
        category: row.get(4)?,
        quantity: row.get(5)?,
        cost_price: row.get(6)?,
        retail_price: row.get(7)?,
    })
}

/// Convert a SQLite row to a Transfer.
///
/// Expected columns: id, from_shop_id, to_shop_id, item_name, quantity, status, created_at
pub fn row_to_transfer(row: &Row) -> rusqlite::Result<Transfer> {
    let id: String = row.get(0)?;
    let from: String = row.get(1)?;
    let to: String = row.get(2)?;
    let status: String = row.get(5)?;
    let created_at: String = row.get(6)?;

    Ok(Transfer {
        id: parse_uuid(&id)?,
        from_shop_id: parse_uuid(&from)?,
        to_shop_id: parse_uuid(&to)?,
        item_name: row.get(3)?,
        quantity: row.get(4)?,
        status: TransferStatus::parse(&status)
            .ok_or_else(|| invalid_text("transfer status", &status))?,
        created_at: parse_datetime(&created_at)?,
    })
}

fn invalid_text(what: &str, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Unknown {}: {}", what, value),
        )),
    )
}

/// Parse a UUID from string.
fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Format a DateTime for SQLite storage.
///
/// Always millisecond precision with a `Z` suffix, so stored values compare
/// correctly as strings.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_datetime_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        let late = stockroom_core::storage::end_of_day(whole.date_naive());

        assert_eq!(format_datetime(&whole), "2024-06-15T10:30:00.000Z");
        assert_eq!(format_datetime(&late), "2024-06-15T23:59:59.999Z");
        assert!(format_datetime(&whole) < format_datetime(&late));
    }

    #[test]
    fn test_parse_datetime_round_trip() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 31, 8, 0, 0).unwrap();
        assert_eq!(parse_datetime(&format_datetime(&dt)).unwrap(), dt);
    }

    #[test]
    fn test_parse_datetime_invalid() {
        assert!(parse_datetime("not-a-datetime").is_err());
    }

    #[test]
    fn test_parse_uuid_valid() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(parse_uuid(uuid_str).unwrap().to_string(), uuid_str);
    }

    #[test]
    fn test_parse_uuid_invalid() {
        assert!(parse_uuid("not-a-uuid").is_err());
    }
}
