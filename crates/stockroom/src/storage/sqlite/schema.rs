//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Timestamps are stored as fixed-width RFC 3339 strings
//! (`2024-01-31T23:59:59.999Z`) so that string comparison orders them
//! chronologically.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS shops (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    location TEXT,
    active INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS customers (
    id TEXT PRIMARY KEY,
    shop_id TEXT NOT NULL,
    name TEXT NOT NULL,
    email TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS invoices (
    id TEXT PRIMARY KEY,
    shop_id TEXT NOT NULL,
    customer_id TEXT,
    number TEXT NOT NULL,
    total REAL NOT NULL,
    amount_paid REAL NOT NULL,
    status TEXT NOT NULL,
    issued_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS inventory_items (
    id TEXT PRIMARY KEY,
    shop_id TEXT NOT NULL,
    sku TEXT NOT NULL,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    cost_price REAL NOT NULL,
    retail_price REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS transfers (
    id TEXT PRIMARY KEY,
    from_shop_id TEXT NOT NULL,
    to_shop_id TEXT NOT NULL,
    item_name TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_customers_shop_id ON customers(shop_id);
CREATE INDEX IF NOT EXISTS idx_invoices_shop_issued ON invoices(shop_id, issued_at);
CREATE INDEX IF NOT EXISTS idx_invoices_issued ON invoices(issued_at);
CREATE INDEX IF NOT EXISTS idx_inventory_shop_id ON inventory_items(shop_id);
CREATE INDEX IF NOT EXISTS idx_transfers_created ON transfers(created_at);
"#;

// Shop queries
pub const INSERT_SHOP: &str = r#"
INSERT INTO shops (id, name, location, active, created_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_SHOP_BY_ID: &str = r#"
SELECT id, name, location, active, created_at
FROM shops
WHERE id = ?1
"#;

/// `?1` is 1 to list only active shops, 0 for all.
pub const SELECT_SHOPS: &str = r#"
SELECT id, name, location, active, created_at
FROM shops
WHERE (?1 = 0 OR active = 1)
ORDER BY name
"#;

// Customer queries
pub const INSERT_CUSTOMER: &str = r#"
INSERT INTO customers (id, shop_id, name, email, created_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const COUNT_CUSTOMERS: &str = r#"
SELECT COUNT(*)
FROM customers
WHERE (?1 IS NULL OR shop_id = ?1)
"#;

// Invoice queries
pub const INSERT_INVOICE: &str = r#"
INSERT INTO invoices (id, shop_id, customer_id, number, total, amount_paid, status, issued_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

/// `?1` shop, `?2`/`?3` inclusive window bounds; NULL disables a condition.
pub const SELECT_INVOICES: &str = r#"
SELECT id, shop_id, customer_id, number, total, amount_paid, status, issued_at
FROM invoices
WHERE (?1 IS NULL OR shop_id = ?1)
  AND (?2 IS NULL OR issued_at >= ?2)
  AND (?3 IS NULL OR issued_at <= ?3)
ORDER BY issued_at
"#;

// Inventory queries
pub const INSERT_INVENTORY_ITEM: &str = r#"
INSERT INTO inventory_items (id, shop_id, sku, name, category, quantity, cost_price, retail_price)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

pub const SELECT_INVENTORY: &str = r#"
SELECT id, shop_id, sku, name, category, quantity, cost_price, retail_price
FROM inventory_items
WHERE (?1 IS NULL OR shop_id = ?1)
ORDER BY sku
"#;

// Transfer queries
pub const INSERT_TRANSFER: &str = r#"
INSERT INTO transfers (id, from_shop_id, to_shop_id, item_name, quantity, status, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

/// `?1` shop on either side, `?2`/`?3` window bounds, `?4` limit (-1 for none).
pub const SELECT_TRANSFERS: &str = r#"
SELECT id, from_shop_id, to_shop_id, item_name, quantity, status, created_at
FROM transfers
WHERE (?1 IS NULL OR from_shop_id = ?1 OR to_shop_id = ?1)
  AND (?2 IS NULL OR created_at >= ?2)
  AND (?3 IS NULL OR created_at <= ?3)
ORDER BY created_at DESC
LIMIT ?4
"#;
