//! Order repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Expose add/get/page/update/remove for the order aggregate.
//! - Validate caller arguments before any storage access.
//! - Own connection lifetime: one connection per call, closed on every path.
//!
//! # Invariants
//! - No connection is held between calls, so two calls never share an
//!   in-flight unit of work.
//! - Writes go through `TransactionalWriter`; reads run without a transaction.
//! - Removing an unknown order succeeds without error.

use crate::db::schema::{table_exists, table_has_column, REQUIRED_COLUMNS};
use crate::db::{close_db, ConnectionProvider};
use crate::model::order::{Order, OrderId};
use crate::repo::assembler::{assemble_order, load_header, load_header_page};
use crate::repo::error::{MissingRow, RepoError, RepoResult, ValidationError};
use crate::repo::writer::TransactionalWriter;
use log::{debug, warn};
use rusqlite::Connection;
use std::time::Instant;

/// Repository interface for order aggregate persistence.
pub trait OrderRepository {
    /// Persists a new order and returns its store-assigned identity.
    ///
    /// Any identity already present on `order` is ignored.
    fn add_order(&self, order: &Order) -> RepoResult<OrderId>;
    /// Loads one fully assembled order.
    fn get_order(&self, id: OrderId) -> RepoResult<Order>;
    /// Loads up to `count` orders by ascending identity after skipping `skip`.
    fn get_orders(&self, skip: i64, count: i64) -> RepoResult<Vec<Order>>;
    /// Rewrites the header and replaces the full detail set.
    ///
    /// An identity with no stored header is a `Write` failure.
    fn update_order(&self, order: &Order) -> RepoResult<()>;
    /// Deletes the order's details and header.
    fn remove_order(&self, id: OrderId) -> RepoResult<()>;
}

/// SQLite-backed order repository.
#[derive(Debug)]
pub struct SqliteOrderRepository<P> {
    provider: P,
}

impl<P: ConnectionProvider> SqliteOrderRepository<P> {
    /// Constructs a repository after checking the schema on one connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the database
    ///   lacks part of the order schema.
    /// - `Db` when the connection cannot be opened.
    pub fn try_new(provider: P) -> RepoResult<Self> {
        let conn = provider.open()?;
        let ready = ensure_order_connection_ready(&conn);
        close_db(conn);
        ready?;
        Ok(Self { provider })
    }

    fn read<T, F>(&self, op: &'static str, read: F) -> RepoResult<T>
    where
        F: FnOnce(&Connection) -> RepoResult<T>,
    {
        let started_at = Instant::now();
        let conn = self.provider.open()?;
        let result = read(&conn);
        close_db(conn);

        match &result {
            Ok(_) => debug!(
                "event=order_read module=repo op={} status=ok duration_ms={}",
                op,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=order_read module=repo op={} status=error duration_ms={} error={}",
                op,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

impl<P: ConnectionProvider> OrderRepository for SqliteOrderRepository<P> {
    fn add_order(&self, order: &Order) -> RepoResult<OrderId> {
        TransactionalWriter::new(&self.provider).add(order)
    }

    fn get_order(&self, id: OrderId) -> RepoResult<Order> {
        self.read("get", |conn| {
            let header =
                load_header(conn, id)?.ok_or(RepoError::NotFound(MissingRow::Order(id)))?;
            assemble_order(conn, header)
        })
    }

    fn get_orders(&self, skip: i64, count: i64) -> RepoResult<Vec<Order>> {
        validate_page(skip, count)?;

        self.read("page", |conn| {
            let headers = load_header_page(conn, skip, count)?;
            let mut orders = Vec::with_capacity(headers.len());
            for header in headers {
                orders.push(assemble_order(conn, header)?);
            }
            Ok(orders)
        })
    }

    fn update_order(&self, order: &Order) -> RepoResult<()> {
        let order_id = validate_for_update(order)?;

        TransactionalWriter::new(&self.provider).update(order_id, order)
    }

    fn remove_order(&self, id: OrderId) -> RepoResult<()> {
        TransactionalWriter::new(&self.provider).remove(id)
    }
}

fn validate_page(skip: i64, count: i64) -> Result<(), ValidationError> {
    if skip < 0 {
        return Err(ValidationError::NegativeSkip(skip));
    }
    if count < 1 {
        return Err(ValidationError::NonPositiveCount(count));
    }
    Ok(())
}

fn validate_for_update(order: &Order) -> Result<OrderId, ValidationError> {
    let order_id = order.id.ok_or(ValidationError::MissingOrderId)?;
    for detail in &order.details {
        if let Some(detail_order_id) = detail.order_id {
            if detail_order_id != order_id {
                return Err(ValidationError::ForeignDetail {
                    order_id,
                    detail_order_id,
                });
            }
        }
    }
    Ok(order_id)
}

fn ensure_order_connection_ready(conn: &Connection) -> RepoResult<()> {
    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}
