//! Read assembly: hydrates order aggregates from normalized rows.
//!
//! # Responsibility
//! - Load order header rows (single or paged).
//! - Resolve references and line items into a full `Order`.
//!
//! # Invariants
//! - Resolution order is fixed and sequential: customer, employee, shipper,
//!   then each line's product (with its supplier and category).
//! - Lines come back in insertion order, which the replace-all writer keeps
//!   equal to the in-memory order of the last write.
//! - Reads run outside any transaction.

use crate::model::order::{Order, OrderDetail, OrderId, ShippingAddress};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::lookup;
use crate::repo::params::NamedParams;
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Row};

const ORDER_SELECT_SQL: &str = "SELECT
    OrderID,
    CustomerID,
    EmployeeID,
    OrderDate,
    RequiredDate,
    ShippedDate,
    ShipVia,
    Freight,
    ShipName,
    ShipAddress,
    ShipCity,
    ShipRegion,
    ShipPostalCode,
    ShipCountry
FROM Orders";

/// Header row with foreign keys still unresolved.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OrderHeaderRow {
    id: OrderId,
    customer_id: String,
    employee_id: i64,
    shipper_id: i64,
    order_date: NaiveDateTime,
    required_date: NaiveDateTime,
    shipped_date: Option<NaiveDateTime>,
    freight: f64,
    ship_name: String,
    ship_address: ShippingAddress,
}

#[derive(Debug, Clone, Copy)]
struct DetailRow {
    product_id: i64,
    unit_price: f64,
    quantity: i32,
    discount: f64,
}

pub(crate) fn load_header(conn: &Connection, id: OrderId) -> RepoResult<Option<OrderHeaderRow>> {
    let params = NamedParams::new().integer(":order_id", id);
    let mut stmt = conn.prepare_cached(&format!("{ORDER_SELECT_SQL} WHERE OrderID = :order_id;"))?;
    let header = stmt
        .query_row(params.as_named().as_slice(), parse_header_row)
        .optional()?;
    Ok(header)
}

/// Loads `count` headers in ascending identity order after skipping `skip`.
///
/// Callers validate `skip >= 0` and `count >= 1`.
pub(crate) fn load_header_page(
    conn: &Connection,
    skip: i64,
    count: i64,
) -> RepoResult<Vec<OrderHeaderRow>> {
    let params = NamedParams::new()
        .integer(":count", count)
        .integer(":skip", skip);
    let mut stmt = conn.prepare_cached(&format!(
        "{ORDER_SELECT_SQL} ORDER BY OrderID ASC LIMIT :count OFFSET :skip;"
    ))?;
    let mut rows = stmt.query(params.as_named().as_slice())?;
    let mut headers = Vec::new();
    while let Some(row) = rows.next()? {
        headers.push(parse_header_row(row)?);
    }
    Ok(headers)
}

pub(crate) fn assemble_order(conn: &Connection, header: OrderHeaderRow) -> RepoResult<Order> {
    let customer = lookup::customer(conn, &header.customer_id)?;
    let employee = lookup::employee(conn, header.employee_id)?;
    let shipper = lookup::shipper(conn, header.shipper_id)?;

    let detail_rows = load_detail_rows(conn, header.id)?;
    let mut details = Vec::with_capacity(detail_rows.len());
    for detail in detail_rows {
        details.push(OrderDetail {
            order_id: Some(header.id),
            product: lookup::product(conn, detail.product_id)?,
            unit_price: detail.unit_price,
            quantity: detail.quantity,
            discount: detail.discount,
        });
    }

    Ok(Order {
        id: Some(header.id),
        order_date: header.order_date,
        required_date: header.required_date,
        shipped_date: header.shipped_date,
        freight: header.freight,
        ship_name: header.ship_name,
        ship_address: header.ship_address,
        customer,
        employee,
        shipper,
        details,
    })
}

fn load_detail_rows(conn: &Connection, order_id: OrderId) -> RepoResult<Vec<DetailRow>> {
    let params = NamedParams::new().integer(":order_id", order_id);
    let mut stmt = conn.prepare_cached(
        "SELECT ProductID, UnitPrice, Quantity, Discount
         FROM OrderDetails
         WHERE OrderID = :order_id
         ORDER BY rowid ASC;",
    )?;
    let mut rows = stmt.query(params.as_named().as_slice())?;
    let mut details = Vec::new();
    while let Some(row) = rows.next()? {
        let quantity: i64 = row.get("Quantity")?;
        let quantity = i32::try_from(quantity).map_err(|_| {
            RepoError::InvalidData(format!(
                "quantity `{quantity}` out of range in OrderDetails for order {order_id}"
            ))
        })?;
        details.push(DetailRow {
            product_id: row.get("ProductID")?,
            unit_price: row.get("UnitPrice")?,
            quantity,
            discount: row.get("Discount")?,
        });
    }
    Ok(details)
}

fn parse_header_row(row: &Row<'_>) -> rusqlite::Result<OrderHeaderRow> {
    Ok(OrderHeaderRow {
        id: row.get("OrderID")?,
        customer_id: row.get("CustomerID")?,
        employee_id: row.get("EmployeeID")?,
        shipper_id: row.get("ShipVia")?,
        order_date: row.get("OrderDate")?,
        required_date: row.get("RequiredDate")?,
        shipped_date: row.get("ShippedDate")?,
        freight: row.get("Freight")?,
        ship_name: row.get("ShipName")?,
        ship_address: ShippingAddress {
            address: row.get("ShipAddress")?,
            city: row.get("ShipCity")?,
            region: row.get("ShipRegion")?,
            postal_code: row.get("ShipPostalCode")?,
            country: row.get("ShipCountry")?,
        },
    })
}
