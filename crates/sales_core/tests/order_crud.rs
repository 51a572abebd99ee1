mod common;

use common::{aniseed_syrup, cajun_seasoning, chai, chang, date, sample_order, stored, TestDb};
use sales_core::{
    DbError, MissingRow, OrderDetail, OrderRepository, Product, RepoError, ValidationError,
    WriteOp,
};
use std::error::Error;

#[test]
fn add_then_get_returns_equal_order() {
    let db = TestDb::seeded();
    let repo = db.repository();

    let order = sample_order();
    let id = repo.add_order(&order).unwrap();

    let loaded = repo.get_order(id).unwrap();
    assert_eq!(loaded, stored(order, id));
    assert_eq!(loaded.details.len(), 2);
    assert_eq!(loaded.details[0].product.name, "Chai");
    assert_eq!(loaded.details[1].discount, 0.1);
}

#[test]
fn add_assigns_fresh_identities_that_are_never_reused() {
    let db = TestDb::seeded();
    let repo = db.repository();

    let first = repo.add_order(&sample_order()).unwrap();
    let second = repo.add_order(&sample_order()).unwrap();
    assert!(second > first);

    repo.remove_order(second).unwrap();
    let third = repo.add_order(&sample_order()).unwrap();
    assert!(third > second);
}

#[test]
fn add_ignores_caller_supplied_identity() {
    let db = TestDb::seeded();
    let repo = db.repository();

    let mut order = sample_order();
    order.id = Some(4242);
    let id = repo.add_order(&order).unwrap();

    assert_ne!(id, 4242);
    assert!(matches!(
        repo.get_order(4242),
        Err(RepoError::NotFound(MissingRow::Order(4242)))
    ));
}

#[test]
fn add_stores_absent_optional_fields_as_null() {
    let db = TestDb::seeded();
    let repo = db.repository();

    let id = repo.add_order(&sample_order()).unwrap();

    let nulls = db.count(&format!(
        "SELECT COUNT(*) FROM Orders
         WHERE OrderID = {id} AND ShipRegion IS NULL AND ShippedDate IS NULL"
    ));
    assert_eq!(nulls, 1);
}

#[test]
fn add_round_trips_optional_fields_when_present() {
    let db = TestDb::seeded();
    let repo = db.repository();

    let mut order = sample_order();
    order.shipped_date = Some(date(1997, 9, 2));
    order.ship_address.region = Some("BC".to_string());
    let id = repo.add_order(&order).unwrap();

    let loaded = repo.get_order(id).unwrap();
    assert_eq!(loaded.shipped_date, Some(date(1997, 9, 2)));
    assert_eq!(loaded.ship_address.region.as_deref(), Some("BC"));
}

#[test]
fn add_keeps_quotes_in_text_fields_verbatim() {
    let db = TestDb::seeded();
    let repo = db.repository();

    let mut order = sample_order();
    order.ship_name = "Chop-suey's \"Chinese\"".to_string();
    order.ship_address.address = "O'Connell St. 12".to_string();
    let id = repo.add_order(&order).unwrap();

    let loaded = repo.get_order(id).unwrap();
    assert_eq!(loaded.ship_name, "Chop-suey's \"Chinese\"");
    assert_eq!(loaded.ship_address.address, "O'Connell St. 12");
}

#[test]
fn add_with_zero_details_is_allowed() {
    let db = TestDb::seeded();
    let repo = db.repository();

    let mut order = sample_order();
    order.details.clear();
    let id = repo.add_order(&order).unwrap();

    assert!(repo.get_order(id).unwrap().details.is_empty());
}

#[test]
fn failed_add_leaves_no_partial_order() {
    let db = TestDb::seeded();
    let repo = db.repository();

    let mut order = sample_order();
    order.push_detail(OrderDetail::new(
        Product::new(999, "Ghost", "Nobody", "Nothing"),
        1.0,
        1,
        0.0,
    ));

    let err = repo.add_order(&order).unwrap_err();
    match &err {
        RepoError::Write { op, order_id, .. } => {
            assert_eq!(*op, WriteOp::Add);
            assert_eq!(*order_id, None);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let cause = err.source().unwrap();
    assert!(cause.downcast_ref::<DbError>().is_some());

    assert_eq!(db.count("SELECT COUNT(*) FROM Orders"), 0);
    assert_eq!(db.count("SELECT COUNT(*) FROM OrderDetails"), 0);
}

#[test]
fn get_unknown_order_is_not_found() {
    let db = TestDb::seeded();
    let repo = db.repository();

    assert!(matches!(
        repo.get_order(77),
        Err(RepoError::NotFound(MissingRow::Order(77)))
    ));
}

#[test]
fn get_orders_pages_in_ascending_identity_order() {
    let db = TestDb::seeded();
    let repo = db.repository();

    let ids: Vec<_> = (0..3)
        .map(|_| repo.add_order(&sample_order()).unwrap())
        .collect();

    let first_page = repo.get_orders(0, 2).unwrap();
    let first_ids: Vec<_> = first_page.iter().map(|order| order.id).collect();
    assert_eq!(first_ids, vec![Some(ids[0]), Some(ids[1])]);

    let second_page = repo.get_orders(2, 2).unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0], stored(sample_order(), ids[2]));
}

#[test]
fn get_orders_past_the_end_is_empty() {
    let db = TestDb::seeded();
    let repo = db.repository();
    repo.add_order(&sample_order()).unwrap();

    assert!(repo.get_orders(10, 5).unwrap().is_empty());
}

#[test]
fn get_orders_rejects_invalid_bounds() {
    let db = TestDb::seeded();
    let repo = db.repository();

    assert!(matches!(
        repo.get_orders(-1, 5),
        Err(RepoError::Validation(ValidationError::NegativeSkip(-1)))
    ));
    assert!(matches!(
        repo.get_orders(0, 0),
        Err(RepoError::Validation(ValidationError::NonPositiveCount(0)))
    ));
}

#[test]
fn update_replaces_header_and_full_detail_set() {
    let db = TestDb::seeded();
    let repo = db.repository();
    let id = repo.add_order(&sample_order()).unwrap();

    let mut order = repo.get_order(id).unwrap();
    order.freight = 12.5;
    order.shipped_date = Some(date(1997, 9, 2));
    order.ship_address.city = "Hamburg".to_string();
    order.details.remove(0);
    order.details[0].quantity = 6;
    order.push_detail(OrderDetail::new(aniseed_syrup(), 8.0, 3, 0.0));
    order.push_detail(OrderDetail::new(cajun_seasoning(), 17.6, 1, 0.25));

    repo.update_order(&order).unwrap();

    let loaded = repo.get_order(id).unwrap();
    assert_eq!(loaded, order);
    let names: Vec<_> = loaded
        .details
        .iter()
        .map(|detail| detail.product.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["Chang", "Aniseed Syrup", "Chef Anton's Cajun Seasoning"]
    );
    assert_eq!(
        db.count(&format!(
            "SELECT COUNT(*) FROM OrderDetails WHERE OrderID = {id}"
        )),
        3
    );
}

#[test]
fn update_with_same_details_does_not_duplicate_lines() {
    let db = TestDb::seeded();
    let repo = db.repository();
    let id = repo.add_order(&sample_order()).unwrap();

    let order = repo.get_order(id).unwrap();
    repo.update_order(&order).unwrap();
    repo.update_order(&order).unwrap();

    assert_eq!(repo.get_order(id).unwrap(), order);
    assert_eq!(db.count("SELECT COUNT(*) FROM OrderDetails"), 2);
}

#[test]
fn failed_update_leaves_previous_state_intact() {
    let db = TestDb::seeded();
    let repo = db.repository();
    let id = repo.add_order(&sample_order()).unwrap();
    let before = repo.get_order(id).unwrap();

    let mut broken = before.clone();
    broken.freight = 999.0;
    broken.push_detail(OrderDetail::new(chai(), 1.0, 1, 0.0));

    let err = repo.update_order(&broken).unwrap_err();
    match err {
        RepoError::Write { op, order_id, .. } => {
            assert_eq!(op, WriteOp::Update);
            assert_eq!(order_id, Some(id));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(repo.get_order(id).unwrap(), before);
}

#[test]
fn update_without_identity_is_rejected() {
    let db = TestDb::seeded();
    let repo = db.repository();

    assert!(matches!(
        repo.update_order(&sample_order()),
        Err(RepoError::Validation(ValidationError::MissingOrderId))
    ));
}

#[test]
fn update_with_details_of_another_order_is_rejected() {
    let db = TestDb::seeded();
    let repo = db.repository();
    let first = repo.add_order(&sample_order()).unwrap();
    let second = repo.add_order(&sample_order()).unwrap();

    let mut order = repo.get_order(first).unwrap();
    let mut foreign = OrderDetail::new(chang(), 5.0, 1, 0.0);
    foreign.order_id = Some(second);
    order.details.push(foreign);

    assert!(matches!(
        repo.update_order(&order),
        Err(RepoError::Validation(ValidationError::ForeignDetail { .. }))
    ));
}

#[test]
fn update_unknown_order_is_a_write_failure() {
    let db = TestDb::seeded();
    let repo = db.repository();

    let order = stored(sample_order(), 31);
    let err = repo.update_order(&order).unwrap_err();
    match &err {
        RepoError::Write {
            op: WriteOp::Update,
            order_id: Some(31),
            source: DbError::RowMissing { table: "Orders", id: 31 },
        } => {}
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.source().is_some());
    assert_eq!(db.count("SELECT COUNT(*) FROM Orders"), 0);
    assert_eq!(db.count("SELECT COUNT(*) FROM OrderDetails"), 0);
}

#[test]
fn remove_deletes_header_and_details() {
    let db = TestDb::seeded();
    let repo = db.repository();
    let kept = repo.add_order(&sample_order()).unwrap();
    let removed = repo.add_order(&sample_order()).unwrap();

    repo.remove_order(removed).unwrap();

    assert!(matches!(
        repo.get_order(removed),
        Err(RepoError::NotFound(MissingRow::Order(_)))
    ));
    assert_eq!(
        db.count(&format!(
            "SELECT COUNT(*) FROM OrderDetails WHERE OrderID = {removed}"
        )),
        0
    );
    assert_eq!(repo.get_order(kept).unwrap(), stored(sample_order(), kept));
}

#[test]
fn remove_unknown_order_is_a_no_op() {
    let db = TestDb::seeded();
    let repo = db.repository();
    let id = repo.add_order(&sample_order()).unwrap();

    repo.remove_order(id).unwrap();
    repo.remove_order(id).unwrap();
    repo.remove_order(1234).unwrap();

    assert_eq!(db.count("SELECT COUNT(*) FROM Orders"), 0);
}

#[test]
fn failed_remove_restores_deleted_details() {
    let db = TestDb::seeded();
    let repo = db.repository();
    let id = repo.add_order(&sample_order()).unwrap();
    db.raw()
        .execute_batch(
            "CREATE TRIGGER keep_orders BEFORE DELETE ON Orders
             BEGIN
                 SELECT RAISE(ABORT, 'orders are locked');
             END;",
        )
        .unwrap();

    let err = repo.remove_order(id).unwrap_err();
    match err {
        RepoError::Write { op, order_id, .. } => {
            assert_eq!(op, WriteOp::Remove);
            assert_eq!(order_id, Some(id));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(repo.get_order(id).unwrap(), stored(sample_order(), id));
    assert_eq!(db.count("SELECT COUNT(*) FROM OrderDetails"), 2);
}
