#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use sales_core::{
    install_schema, Customer, Employee, Order, OrderDetail, OrderId, Product, Shipper,
    ShippingAddress, SqliteConfig, SqliteConnectionProvider, SqliteOrderRepository,
};
use std::path::PathBuf;
use tempfile::TempDir;

const SEED_SQL: &str = "
INSERT INTO Customers (CustomerID, CompanyName) VALUES
    ('ALFKI', 'Alfreds Futterkiste'),
    ('VINET', 'Vins et alcools Chevalier'),
    ('NONAM', NULL);

INSERT INTO Employees (EmployeeID, FirstName, LastName, Country) VALUES
    (1, 'Nancy', 'Davolio', 'USA'),
    (5, 'Steven', 'Buchanan', 'UK'),
    (9, 'Anne', 'Dodsworth', NULL);

INSERT INTO Shippers (ShipperID, CompanyName) VALUES
    (1, 'Speedy Express'),
    (2, 'United Package'),
    (3, 'Federal Shipping');

INSERT INTO Suppliers (SupplierID, CompanyName) VALUES
    (1, 'Exotic Liquids'),
    (2, 'New Orleans Cajun Delights'),
    (3, NULL);

INSERT INTO Categories (CategoryID, CategoryName) VALUES
    (1, 'Beverages'),
    (2, 'Condiments');

INSERT INTO Products (ProductID, ProductName, SupplierID, CategoryID) VALUES
    (1, 'Chai', 1, 1),
    (2, 'Chang', 1, 1),
    (3, 'Aniseed Syrup', 1, 2),
    (4, 'Chef Anton''s Cajun Seasoning', 2, 2),
    (5, 'Mystery Sauce', NULL, NULL),
    (6, 'Shadow Tea', 3, 1);
";

/// Temporary database file; removed when dropped.
pub struct TestDb {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestDb {
    /// Database with the order schema and Northwind-style reference rows.
    pub fn seeded() -> Self {
        let db = Self::empty();
        let conn = db.raw();
        install_schema(&conn).unwrap();
        conn.execute_batch(SEED_SQL).unwrap();
        db
    }

    /// Path to a database file that does not exist yet.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.sqlite3");
        Self { _dir: dir, path }
    }

    pub fn provider(&self) -> SqliteConnectionProvider {
        SqliteConnectionProvider::new(SqliteConfig::new(&self.path))
    }

    pub fn repository(&self) -> SqliteOrderRepository<SqliteConnectionProvider> {
        SqliteOrderRepository::try_new(self.provider()).unwrap()
    }

    /// Direct connection with foreign keys off, for inspecting or breaking
    /// stored rows behind the repository's back.
    pub fn raw(&self) -> Connection {
        let conn = Connection::open(&self.path).unwrap();
        conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
        conn
    }

    pub fn count(&self, sql: &str) -> i64 {
        self.raw().query_row(sql, [], |row| row.get(0)).unwrap()
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|value| value.and_hms_opt(0, 0, 0))
        .unwrap()
}

pub fn chai() -> Product {
    Product::new(1, "Chai", "Exotic Liquids", "Beverages")
}

pub fn chang() -> Product {
    Product::new(2, "Chang", "Exotic Liquids", "Beverages")
}

pub fn aniseed_syrup() -> Product {
    Product::new(3, "Aniseed Syrup", "Exotic Liquids", "Condiments")
}

pub fn cajun_seasoning() -> Product {
    Product::new(
        4,
        "Chef Anton's Cajun Seasoning",
        "New Orleans Cajun Delights",
        "Condiments",
    )
}

pub fn nancy() -> Employee {
    let mut employee = Employee::new(1, "Nancy", "Davolio");
    employee.country = Some("USA".to_string());
    employee
}

/// Unsaved order for ALFKI with two lines (Chai x2 @ 10.0, Chang x1 @ 5.0
/// with 10% discount). Reference display fields match the seed rows.
pub fn sample_order() -> Order {
    let mut order = Order::new(
        Customer::new("ALFKI", "Alfreds Futterkiste"),
        nancy(),
        Shipper::new(1, "Speedy Express"),
        date(1997, 8, 25),
        date(1997, 9, 22),
    );
    order.freight = 29.46;
    order.ship_name = "Alfreds Futterkiste".to_string();
    order.ship_address = ShippingAddress {
        address: "Obere Str. 57".to_string(),
        city: "Berlin".to_string(),
        region: None,
        postal_code: "12209".to_string(),
        country: "Germany".to_string(),
    };
    order.push_detail(OrderDetail::new(chai(), 10.0, 2, 0.0));
    order.push_detail(OrderDetail::new(chang(), 5.0, 1, 0.1));
    order
}

/// `order` as it should read back once stored under `id`.
pub fn stored(mut order: Order, id: OrderId) -> Order {
    order.id = Some(id);
    for detail in &mut order.details {
        detail.order_id = Some(id);
    }
    order
}
