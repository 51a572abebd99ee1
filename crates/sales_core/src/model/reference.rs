//! External reference entities resolved while reading an order.
//!
//! # Responsibility
//! - Carry the identity and display fields of customers, employees,
//!   shippers and products.
//!
//! # Invariants
//! - Only the identity field of each reference is written with an order.
//! - Display fields are hydrated at read time and may hold a placeholder
//!   when the source row has no name.

use serde::{Deserialize, Serialize};

/// Customer referenced by an order header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Short alphanumeric customer code (for example `ALFKI`).
    pub id: String,
    pub company_name: String,
}

impl Customer {
    pub fn new(id: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            company_name: company_name.into(),
        }
    }
}

/// Employee who took the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Nullable in the source table.
    pub country: Option<String>,
}

impl Employee {
    pub fn new(id: i64, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            country: None,
        }
    }

    /// Returns `"<first> <last>"` for display.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Shipping company, stored on the header as `ShipVia`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipper {
    pub id: i64,
    pub company_name: String,
}

impl Shipper {
    pub fn new(id: i64, company_name: impl Into<String>) -> Self {
        Self {
            id,
            company_name: company_name.into(),
        }
    }
}

/// Product sold on one order line.
///
/// Supplier and category names are resolved when the order is read and are
/// never stored alongside the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub supplier_name: String,
    pub category_name: String,
}

impl Product {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        supplier_name: impl Into<String>,
        category_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            supplier_name: supplier_name.into(),
            category_name: category_name.into(),
        }
    }
}
