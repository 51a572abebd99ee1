//! Order aggregate model.
//!
//! # Responsibility
//! - Define the order header, its line items and the shipping address value.
//! - Provide constructors used by callers building new orders.
//!
//! # Invariants
//! - `Order::id` is `None` until the store assigns an identity on insert and
//!   never changes afterwards.
//! - Line items are owned exclusively by their order; `OrderDetail::order_id`
//!   is a non-owning back-reference to the owning header.
//! - `details` keeps caller order; reads return lines in insertion order.

use crate::model::reference::{Customer, Employee, Product, Shipper};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Store-assigned order identity (`Orders.OrderID`).
pub type OrderId = i64;

/// Destination address printed on the shipment. Value type without identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    /// Optional; persisted as `NULL` when absent.
    pub region: Option<String>,
    pub postal_code: String,
    pub country: String,
}

/// One order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    /// Owning order identity, `None` until the owning order is persisted.
    pub order_id: Option<OrderId>,
    pub product: Product,
    pub unit_price: f64,
    /// Expected to be positive; not enforced.
    pub quantity: i32,
    /// Fraction in `[0, 1]`, e.g. `0.1` for ten percent.
    pub discount: f64,
}

impl OrderDetail {
    /// Creates a detail line that is not yet attached to a stored order.
    pub fn new(product: Product, unit_price: f64, quantity: i32, discount: f64) -> Self {
        Self {
            order_id: None,
            product,
            unit_price,
            quantity,
            discount,
        }
    }
}

/// Sales order aggregate: header fields, references and line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<OrderId>,
    pub order_date: NaiveDateTime,
    pub required_date: NaiveDateTime,
    pub shipped_date: Option<NaiveDateTime>,
    pub freight: f64,
    pub ship_name: String,
    pub ship_address: ShippingAddress,
    pub customer: Customer,
    pub employee: Employee,
    pub shipper: Shipper,
    pub details: Vec<OrderDetail>,
}

impl Order {
    /// Creates an unsaved order with no lines, no freight and an empty
    /// shipping destination.
    pub fn new(
        customer: Customer,
        employee: Employee,
        shipper: Shipper,
        order_date: NaiveDateTime,
        required_date: NaiveDateTime,
    ) -> Self {
        Self {
            id: None,
            order_date,
            required_date,
            shipped_date: None,
            freight: 0.0,
            ship_name: String::new(),
            ship_address: ShippingAddress::default(),
            customer,
            employee,
            shipper,
            details: Vec::new(),
        }
    }

    /// Appends one line, pointing its back-reference at this order.
    pub fn push_detail(&mut self, mut detail: OrderDetail) {
        detail.order_id = self.id;
        self.details.push(detail);
    }

    /// Returns whether the store has assigned an identity to this order.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
