//! Service layer entry points.
//!
//! # Responsibility
//! - Expose repository operations to async callers.
//!
//! # Invariants
//! - Services add no persistence rules of their own; they delegate to a
//!   repository implementation.

pub mod order_service;
