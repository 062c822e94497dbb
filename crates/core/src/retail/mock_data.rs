//! Mock data generation for seeding and tests.
//!
//! Pure functions only: the same `today` always yields the same shape of data
//! (record IDs are random).

use chrono::{Duration, NaiveDate, NaiveTime};

use super::types::{
    Customer, InventoryItem, Invoice, InvoiceStatus, Shop, Transfer, TransferStatus,
};

/// A complete set of retail records.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub shops: Vec<Shop>,
    pub customers: Vec<Customer>,
    pub invoices: Vec<Invoice>,
    pub items: Vec<InventoryItem>,
    pub transfers: Vec<Transfer>,
}

const SHOPS: [(&str, &str); 4] = [
    ("Harbour Street", "Portside"),
    ("Market Square", "Old Town"),
    ("Riverside", "East Bank"),
    ("Warehouse Outlet", "Industrial Park"),
];

const CATALOG: [(&str, &str, f64, f64); 8] = [
    ("LMP", "Desk Lamp", 18.0, 39.0),
    ("LMP", "Floor Lamp", 42.0, 95.0),
    ("RUG", "Wool Rug", 80.0, 189.0),
    ("RUG", "Runner", 25.0, 59.0),
    ("MUG", "Stoneware Mug", 3.5, 12.0),
    ("MUG", "Travel Mug", 6.0, 19.0),
    ("CHR", "Oak Chair", 60.0, 149.0),
    ("CHR", "Stool", 22.0, 55.0),
];

const CUSTOMERS: [&str; 6] = ["Ada", "Bo", "Cleo", "Dev", "Esme", "Finn"];

fn category_of(code: &str) -> &'static str {
    match code {
        "LMP" => "Lighting",
        "RUG" => "Textiles",
        "MUG" => "Kitchen",
        _ => "Furniture",
    }
}

/// Generates a demo data set spread over the six months before `today`.
///
/// The last shop is inactive. Invoices cycle through every status so the
/// outstanding balance and revenue metrics both have something to show.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use stockroom_core::retail::generate_seed_data;
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
/// let seed = generate_seed_data(today);
///
/// assert_eq!(seed.shops.len(), 4);
/// assert_eq!(seed.shops.iter().filter(|s| s.active).count(), 3);
/// assert!(seed.invoices.iter().all(|i| i.issued_at.date_naive() <= today));
/// ```
pub fn generate_seed_data(today: NaiveDate) -> SeedData {
    let noon = |date: NaiveDate| date.and_time(NaiveTime::MIN).and_utc() + Duration::hours(12);
    let mut seed = SeedData::default();

    for (index, (name, location)) in SHOPS.iter().enumerate() {
        let shop = Shop::new(*name)
            .with_location(*location)
            .with_created_at(noon(today - Duration::days(400)));
        let shop = if index == SHOPS.len() - 1 {
            shop.inactive()
        } else {
            shop
        };
        seed.shops.push(shop);
    }

    for (shop_index, shop) in seed.shops.iter().enumerate() {
        for (n, name) in CUSTOMERS.iter().enumerate().skip(shop_index % 2) {
            let customer = Customer::new(shop.id, *name)
                .with_email(format!("{}.{}@example.com", name.to_lowercase(), shop_index))
                .with_created_at(noon(today - Duration::days(30 * n as i64)));
            seed.customers.push(customer);
        }

        for (n, (code, name, cost, retail)) in CATALOG.iter().enumerate() {
            let quantity = ((shop_index + 1) * (n + 3) % 17) as i64;
            seed.items.push(
                InventoryItem::new(
                    shop.id,
                    format!("{}-{}{:02}", code, shop_index, n),
                    *name,
                    category_of(code),
                )
                .with_quantity(quantity)
                .with_prices(*cost, *retail),
            );
        }

        let statuses = [
            InvoiceStatus::Paid,
            InvoiceStatus::Pending,
            InvoiceStatus::Paid,
            InvoiceStatus::Overdue,
            InvoiceStatus::Cancelled,
        ];
        for n in 0..24 {
            let status = statuses[n % statuses.len()];
            let total = 40.0 + ((n * 37 + shop_index * 11) % 260) as f64;
            let issued = today - Duration::days((n * 7 + shop_index) as i64);
            let invoice = Invoice::new(shop.id, format!("INV-{}{:03}", shop_index, n), total)
                .with_status(status)
                .with_issued_at(noon(issued));
            let invoice = match status {
                InvoiceStatus::Paid => invoice.with_amount_paid(total),
                InvoiceStatus::Overdue => invoice.with_amount_paid((total / 4.0).floor()),
                _ => invoice,
            };
            seed.invoices.push(invoice);
        }
    }

    let active: Vec<&Shop> = seed.shops.iter().filter(|shop| shop.active).collect();
    let statuses = [
        TransferStatus::Completed,
        TransferStatus::InTransit,
        TransferStatus::Pending,
        TransferStatus::Cancelled,
    ];
    for n in 0..12 {
        let from = active[n % active.len()];
        let to = active[(n + 1) % active.len()];
        let (_, item_name, _, _) = CATALOG[n % CATALOG.len()];
        seed.transfers.push(
            Transfer::new(from.id, to.id, item_name, (n % 5 + 1) as i64)
                .with_status(statuses[n % statuses.len()])
                .with_created_at(noon(today - Duration::days((n * 4) as i64))),
        );
    }

    seed
}
