//! Point lookups for the references hanging off an order.
//!
//! # Responsibility
//! - Resolve customer, employee, shipper, product, supplier and category
//!   rows one query at a time.
//!
//! # Invariants
//! - Each lookup is independent and stateless; nothing is cached between
//!   calls beyond rusqlite's prepared statement cache.
//! - Missing employee/shipper/product rows fail with `NotFound`.
//! - Missing display names (no row or `NULL`) resolve to `UNKNOWN_NAME`.

use crate::model::reference::{Customer, Employee, Product, Shipper};
use crate::repo::error::{MissingRow, RepoError, RepoResult};
use crate::repo::params::NamedParams;
use rusqlite::{Connection, OptionalExtension};

/// Display name used when a cosmetic name lookup yields no value.
pub const UNKNOWN_NAME: &str = "Unknown";

pub(crate) fn customer(conn: &Connection, customer_id: &str) -> RepoResult<Customer> {
    let company_name = optional_name(
        conn,
        "SELECT CompanyName FROM Customers WHERE CustomerID = :customer_id;",
        NamedParams::new().text(":customer_id", customer_id),
    )?;

    Ok(Customer {
        id: customer_id.to_owned(),
        company_name: company_name.unwrap_or_else(|| UNKNOWN_NAME.to_owned()),
    })
}

pub(crate) fn employee(conn: &Connection, employee_id: i64) -> RepoResult<Employee> {
    let params = NamedParams::new().integer(":employee_id", employee_id);
    let mut stmt = conn.prepare_cached(
        "SELECT EmployeeID, FirstName, LastName, Country
         FROM Employees
         WHERE EmployeeID = :employee_id;",
    )?;
    let employee = stmt
        .query_row(params.as_named().as_slice(), |row| {
            Ok(Employee {
                id: row.get("EmployeeID")?,
                first_name: row.get("FirstName")?,
                last_name: row.get("LastName")?,
                country: row.get("Country")?,
            })
        })
        .optional()?;

    employee.ok_or(RepoError::NotFound(MissingRow::Employee(employee_id)))
}

pub(crate) fn shipper(conn: &Connection, shipper_id: i64) -> RepoResult<Shipper> {
    let params = NamedParams::new().integer(":shipper_id", shipper_id);
    let mut stmt = conn.prepare_cached(
        "SELECT ShipperID, CompanyName
         FROM Shippers
         WHERE ShipperID = :shipper_id;",
    )?;
    let shipper = stmt
        .query_row(params.as_named().as_slice(), |row| {
            Ok(Shipper {
                id: row.get("ShipperID")?,
                company_name: row.get("CompanyName")?,
            })
        })
        .optional()?;

    shipper.ok_or(RepoError::NotFound(MissingRow::Shipper(shipper_id)))
}

/// Resolves a product and then, in sequence, its supplier and category names.
pub(crate) fn product(conn: &Connection, product_id: i64) -> RepoResult<Product> {
    let params = NamedParams::new().integer(":product_id", product_id);
    let row = {
        let mut stmt = conn.prepare_cached(
            "SELECT ProductName, SupplierID, CategoryID
             FROM Products
             WHERE ProductID = :product_id;",
        )?;
        stmt.query_row(params.as_named().as_slice(), |row| {
            Ok((
                row.get::<_, String>("ProductName")?,
                row.get::<_, Option<i64>>("SupplierID")?,
                row.get::<_, Option<i64>>("CategoryID")?,
            ))
        })
        .optional()?
    };
    let Some((name, supplier_id, category_id)) = row else {
        return Err(RepoError::NotFound(MissingRow::Product(product_id)));
    };

    let supplier_name = match supplier_id {
        Some(id) => optional_name(
            conn,
            "SELECT CompanyName FROM Suppliers WHERE SupplierID = :supplier_id;",
            NamedParams::new().integer(":supplier_id", id),
        )?,
        None => None,
    };
    let category_name = match category_id {
        Some(id) => optional_name(
            conn,
            "SELECT CategoryName FROM Categories WHERE CategoryID = :category_id;",
            NamedParams::new().integer(":category_id", id),
        )?,
        None => None,
    };

    Ok(Product {
        id: product_id,
        name,
        supplier_name: supplier_name.unwrap_or_else(|| UNKNOWN_NAME.to_owned()),
        category_name: category_name.unwrap_or_else(|| UNKNOWN_NAME.to_owned()),
    })
}

/// Runs a single-column name query; both "no row" and `NULL` map to `None`.
fn optional_name(
    conn: &Connection,
    sql: &str,
    params: NamedParams,
) -> RepoResult<Option<String>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let name = stmt
        .query_row(params.as_named().as_slice(), |row| {
            row.get::<_, Option<String>>(0)
        })
        .optional()?;
    Ok(name.flatten())
}
