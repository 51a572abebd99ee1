//! Error taxonomy for order repository operations.
//!
//! # Invariants
//! - `Validation` is produced before any connection is opened.
//! - `Write` is produced only after the transaction was rolled back and the
//!   connection closed; its `source()` is the original storage failure.
//! - `NotFound` covers structurally required rows only; cosmetic names fall
//!   back to a placeholder instead.

use crate::db::DbError;
use crate::model::order::OrderId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Caller-supplied argument violated a precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Page offset below zero.
    NegativeSkip(i64),
    /// Page size below one.
    NonPositiveCount(i64),
    /// Update requested for an order that was never persisted.
    MissingOrderId,
    /// A detail line points at a different order than the one being written.
    ForeignDetail {
        order_id: OrderId,
        detail_order_id: OrderId,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeSkip(skip) => write!(f, "skip must be >= 0, got {skip}"),
            Self::NonPositiveCount(count) => write!(f, "count must be >= 1, got {count}"),
            Self::MissingOrderId => write!(f, "order has no identity; add it before updating"),
            Self::ForeignDetail {
                order_id,
                detail_order_id,
            } => write!(
                f,
                "order {order_id} contains a detail owned by order {detail_order_id}"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Required row that was absent while assembling or writing an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingRow {
    Order(OrderId),
    Employee(i64),
    Shipper(i64),
    Product(i64),
}

impl Display for MissingRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Order(id) => write!(f, "order {id}"),
            Self::Employee(id) => write!(f, "employee {id}"),
            Self::Shipper(id) => write!(f, "shipper {id}"),
            Self::Product(id) => write!(f, "product {id}"),
        }
    }
}

/// Transactional write that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Add,
    Update,
    Remove,
}

impl WriteOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Remove => "remove",
        }
    }
}

/// Repository error for order persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    NotFound(MissingRow),
    /// A statement inside a transactional write failed; the transaction was
    /// rolled back.
    Write {
        op: WriteOp,
        order_id: Option<OrderId>,
        source: DbError,
    },
    /// Read-path storage failure.
    Db(DbError),
    /// Connection schema lacks a table the repository needs.
    MissingRequiredTable(&'static str),
    /// Connection schema lacks a column the repository needs.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid order.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid argument: {err}"),
            Self::NotFound(row) => write!(f, "not found: {row}"),
            Self::Write {
                op,
                order_id: Some(id),
                source,
            } => write!(f, "order {} failed for order {id}: {source}", op.as_str()),
            Self::Write {
                op,
                order_id: None,
                source,
            } => write!(f, "order {} failed: {source}", op.as_str()),
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "order repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "order repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted order data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Write { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
