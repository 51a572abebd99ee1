//! Repository layer for the sales order aggregate.
//!
//! # Responsibility
//! - Define the order repository contract and its SQLite implementation.
//! - Isolate SQL, parameter binding and read assembly from callers.
//!
//! # Invariants
//! - Every statement is parameterized through `NamedParams`.
//! - Multi-table writes are atomic; reads are not isolated from writers.

mod assembler;
pub mod error;
pub mod lookup;
pub mod order_repo;
pub mod params;
mod writer;
