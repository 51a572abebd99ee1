//! Persistence core for the sales order aggregate.
//! This crate owns every rule about how orders and their lines are stored,
//! read back and kept consistent.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{
    install_schema, ConnectionProvider, DbError, DbResult, SqliteConfig, SqliteConnectionProvider,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::order::{Order, OrderDetail, OrderId, ShippingAddress};
pub use model::reference::{Customer, Employee, Product, Shipper};
pub use repo::error::{MissingRow, RepoError, RepoResult, ValidationError, WriteOp};
pub use repo::lookup::UNKNOWN_NAME;
pub use repo::order_repo::{OrderRepository, SqliteOrderRepository};
pub use repo::params::NamedParams;
pub use service::order_service::{OrderService, OrderServiceError, OrderServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
