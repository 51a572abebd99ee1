//! Transactional writes for the order aggregate.
//!
//! # Responsibility
//! - Run add/update/remove as one unit of work each: open connection, begin
//!   transaction, execute statements, commit or roll back, close.
//! - Implement replace-all detail semantics for updates.
//!
//! # Invariants
//! - All statements of one call share one connection and one transaction.
//! - On any failure the transaction is rolled back and the connection is
//!   closed before `RepoError::Write` reaches the caller.
//! - The generated identity is read on the insert's own connection,
//!   immediately after the header insert.
//! - Details are never diffed: updates delete every stored line and insert
//!   the in-memory set.

use crate::db::{close_db, ConnectionProvider, DbError, DbResult};
use crate::model::order::{Order, OrderDetail, OrderId};
use crate::repo::error::{RepoError, RepoResult, WriteOp};
use crate::repo::params::NamedParams;
use log::{debug, error, info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::time::Instant;

const INSERT_HEADER_SQL: &str = "INSERT INTO Orders (
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
) VALUES (
    :customer_id,
    :employee_id,
    :order_date,
    :required_date,
    :shipped_date,
    :ship_via,
    :freight,
    :ship_name,
    :ship_address,
    :ship_city,
    :ship_region,
    :ship_postal_code,
    :ship_country
);";

const UPDATE_HEADER_SQL: &str = "UPDATE Orders
SET
    CustomerID = :customer_id,
    EmployeeID = :employee_id,
    OrderDate = :order_date,
    RequiredDate = :required_date,
    ShippedDate = :shipped_date,
    ShipVia = :ship_via,
    Freight = :freight,
    ShipName = :ship_name,
    ShipAddress = :ship_address,
    ShipCity = :ship_city,
    ShipRegion = :ship_region,
    ShipPostalCode = :ship_postal_code,
    ShipCountry = :ship_country
WHERE OrderID = :order_id;";

const INSERT_DETAIL_SQL: &str = "INSERT INTO OrderDetails (
    OrderID,
    ProductID,
    UnitPrice,
    Quantity,
    Discount
) VALUES (:order_id, :product_id, :unit_price, :quantity, :discount);";

const DELETE_DETAILS_SQL: &str = "DELETE FROM OrderDetails WHERE OrderID = :order_id;";

const DELETE_HEADER_SQL: &str = "DELETE FROM Orders WHERE OrderID = :order_id;";

/// Executes order writes against connections from `P`.
pub(crate) struct TransactionalWriter<'p, P> {
    provider: &'p P,
}

impl<'p, P: ConnectionProvider> TransactionalWriter<'p, P> {
    pub(crate) fn new(provider: &'p P) -> Self {
        Self { provider }
    }

    /// Inserts header and lines; returns the store-assigned identity.
    ///
    /// `order.id` and each line's `order_id` are ignored.
    pub(crate) fn add(&self, order: &Order) -> RepoResult<OrderId> {
        let order_id = self.run(WriteOp::Add, None, |tx| {
            tx.execute(INSERT_HEADER_SQL, header_params(order).as_named().as_slice())?;
            let order_id = self.provider.last_insert_id(tx)?;
            insert_details(tx, order_id, &order.details)?;
            Ok(order_id)
        })?;

        info!(
            "event=order_write module=repo op=add status=assigned order_id={} detail_count={}",
            order_id,
            order.details.len()
        );
        Ok(order_id)
    }

    /// Rewrites the header and replaces every line of order `order_id`.
    ///
    /// An identity with no header row fails with `DbError::RowMissing`
    /// before any detail statement runs.
    pub(crate) fn update(&self, order_id: OrderId, order: &Order) -> RepoResult<()> {
        self.run(WriteOp::Update, Some(order_id), |tx| {
            let params = header_params(order).integer(":order_id", order_id);
            let changed = tx.execute(UPDATE_HEADER_SQL, params.as_named().as_slice())?;
            if changed == 0 {
                return Err(DbError::RowMissing {
                    table: "Orders",
                    id: order_id,
                });
            }

            delete_details(tx, order_id)?;
            insert_details(tx, order_id, &order.details)
        })
    }

    /// Deletes lines, then the header. Zero affected rows is not an error.
    pub(crate) fn remove(&self, order_id: OrderId) -> RepoResult<()> {
        let removed = self.run(WriteOp::Remove, Some(order_id), |tx| {
            delete_details(tx, order_id)?;
            let params = NamedParams::new().integer(":order_id", order_id);
            let removed = tx.execute(DELETE_HEADER_SQL, params.as_named().as_slice())?;
            Ok(removed)
        })?;

        if removed == 0 {
            debug!(
                "event=order_write module=repo op=remove status=noop order_id={}",
                order_id
            );
        }
        Ok(())
    }

    fn run<T, F>(&self, op: WriteOp, order_id: Option<OrderId>, body: F) -> RepoResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> DbResult<T>,
    {
        let started_at = Instant::now();
        let mut conn = self
            .provider
            .open()
            .map_err(|source| RepoError::Write {
                op,
                order_id,
                source,
            })?;

        let outcome = run_unit(&mut conn, op, body);
        close_db(conn);

        match outcome {
            Ok(value) => {
                debug!(
                    "event=order_write module=repo op={} status=ok duration_ms={}",
                    op.as_str(),
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(source) => {
                error!(
                    "event=order_write module=repo op={} status=error duration_ms={} error={}",
                    op.as_str(),
                    started_at.elapsed().as_millis(),
                    source
                );
                Err(RepoError::Write {
                    op,
                    order_id,
                    source,
                })
            }
        }
    }
}

/// One transaction on an open connection. Commits on `Ok`, rolls back on
/// `Err`; the connection itself is closed by the caller.
fn run_unit<T, F>(conn: &mut Connection, op: WriteOp, body: F) -> DbResult<T>
where
    F: FnOnce(&Transaction<'_>) -> DbResult<T>,
{
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    debug!(
        "event=order_tx module=repo op={} status=begin",
        op.as_str()
    );

    match body(&tx) {
        Ok(value) => {
            tx.commit()?;
            debug!(
                "event=order_tx module=repo op={} status=committed",
                op.as_str()
            );
            Ok(value)
        }
        Err(err) => {
            match tx.rollback() {
                Ok(()) => warn!(
                    "event=order_tx module=repo op={} status=rolled_back error={}",
                    op.as_str(),
                    err
                ),
                Err(rollback_err) => error!(
                    "event=order_tx module=repo op={} status=rollback_failed error={} rollback_error={}",
                    op.as_str(),
                    err,
                    rollback_err
                ),
            }
            Err(err)
        }
    }
}

fn header_params(order: &Order) -> NamedParams {
    let address = &order.ship_address;
    NamedParams::new()
        .text(":customer_id", &order.customer.id)
        .integer(":employee_id", order.employee.id)
        .datetime(":order_date", order.order_date)
        .datetime(":required_date", order.required_date)
        .opt_datetime(":shipped_date", order.shipped_date)
        .integer(":ship_via", order.shipper.id)
        .real(":freight", order.freight)
        .text(":ship_name", &order.ship_name)
        .text(":ship_address", &address.address)
        .text(":ship_city", &address.city)
        .opt_text(":ship_region", address.region.as_deref())
        .text(":ship_postal_code", &address.postal_code)
        .text(":ship_country", &address.country)
}

fn insert_details(tx: &Transaction<'_>, order_id: OrderId, details: &[OrderDetail]) -> DbResult<()> {
    let mut stmt = tx.prepare_cached(INSERT_DETAIL_SQL)?;
    for detail in details {
        let params = NamedParams::new()
            .integer(":order_id", order_id)
            .integer(":product_id", detail.product.id)
            .real(":unit_price", detail.unit_price)
            .integer(":quantity", i64::from(detail.quantity))
            .real(":discount", detail.discount);
        stmt.execute(params.as_named().as_slice())?;
    }
    Ok(())
}

fn delete_details(tx: &Transaction<'_>, order_id: OrderId) -> DbResult<usize> {
    let params = NamedParams::new().integer(":order_id", order_id);
    let removed = tx.execute(DELETE_DETAILS_SQL, params.as_named().as_slice())?;
    Ok(removed)
}
