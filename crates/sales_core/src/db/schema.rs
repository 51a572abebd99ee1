//! Order store schema: installation and introspection helpers.
//!
//! # Responsibility
//! - Create the order and reference tables on a fresh database.
//! - Describe the tables/columns repositories require before touching data.
//!
//! # Invariants
//! - `install_schema` is idempotent and never alters existing tables.
//! - `REQUIRED_COLUMNS` lists every column the repository reads or writes.

use super::DbResult;
use log::info;
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Tables and columns the order repository depends on.
pub const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "Orders",
        &[
            "OrderID",
            "CustomerID",
            "EmployeeID",
            "OrderDate",
            "RequiredDate",
            "ShippedDate",
            "ShipVia",
            "Freight",
            "ShipName",
            "ShipAddress",
            "ShipCity",
            "ShipRegion",
            "ShipPostalCode",
            "ShipCountry",
        ],
    ),
    (
        "OrderDetails",
        &["OrderID", "ProductID", "UnitPrice", "Quantity", "Discount"],
    ),
    ("Customers", &["CustomerID", "CompanyName"]),
    (
        "Employees",
        &["EmployeeID", "FirstName", "LastName", "Country"],
    ),
    ("Shippers", &["ShipperID", "CompanyName"]),
    (
        "Products",
        &["ProductID", "ProductName", "SupplierID", "CategoryID"],
    ),
    ("Suppliers", &["SupplierID", "CompanyName"]),
    ("Categories", &["CategoryID", "CategoryName"]),
];

/// Creates any missing order store tables.
///
/// This is a bootstrap helper for empty databases, not a migration runner:
/// tables that already exist are left untouched.
pub fn install_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    info!(
        "event=schema_install module=db status=ok tables={}",
        REQUIRED_COLUMNS.len()
    );
    Ok(())
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn table_has_column(
    conn: &Connection,
    table: &str,
    column: &str,
) -> rusqlite::Result<bool> {
    // PRAGMA arguments cannot be bound; `table` only ever comes from
    // `REQUIRED_COLUMNS`.
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current.eq_ignore_ascii_case(column) {
            return Ok(true);
        }
    }
    Ok(false)
}
