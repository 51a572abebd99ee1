//! Sales order domain model.
//!
//! # Responsibility
//! - Define the order aggregate (header plus line items) persisted by core.
//! - Define the external reference entities an order points at.
//!
//! # Invariants
//! - Every persisted order is identified by a store-assigned `OrderId`.
//! - Reference entities are plain data carriers; core never writes them.

pub mod order;
pub mod reference;
