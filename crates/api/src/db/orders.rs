//! Order repository.
//!
//! Placing an order is the store's widest transaction: it validates the
//! items, decrements catalog stock and credits loyalty points, all under one
//! write guard. The fulfillment lifecycle afterwards is a pure state-machine
//! walk over [`OrderStatus`].

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use levelup_core::{Clp, OrderId, OrderStatus, UserId, pricing};

use super::{Db, RepositoryError, ledger};
use crate::models::{Address, LedgerSource, Order, OrderItem};

/// Input for placing an order.
///
/// `total_price` and `shipping_price` arrive from the client's checkout;
/// the points credit is always recomputed server-side from the item
/// snapshots.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
    pub payment_method: String,
    pub total_price: Clp,
    pub shipping_price: Clp,
}

/// Repository for order operations.
pub struct OrderRepository<'a> {
    db: &'a Db,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Place an order.
    ///
    /// In one transaction: checks the buyer and the items, decrements stock
    /// for every line whose product id resolves in the catalog, appends the
    /// order as `Pendiente`/paid, and credits the loyalty points earned.
    /// Lines whose id does not resolve (redeemed rewards, since-deleted
    /// products) pass through untouched. Nothing mutates unless every check
    /// passes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::EmptyCart` if there are no items.
    /// Returns `RepositoryError::NotFound` if the buyer does not exist.
    /// Returns `RepositoryError::Validation` if a catalog product in the
    /// items lacks stock, or the item amounts overflow.
    pub fn create(&self, new: NewOrder) -> Result<Order, RepositoryError> {
        if new.items.is_empty() {
            return Err(RepositoryError::EmptyCart);
        }

        let mut tables = self.db.write();
        if !tables.users.contains(new.user_id.as_uuid()) {
            return Err(RepositoryError::NotFound);
        }

        let subtotal = items_subtotal(&new.items)?;

        // Stock demand per catalog product, aggregated across lines.
        let mut required: HashMap<Uuid, u64> = HashMap::new();
        for item in &new.items {
            if let Some(product_id) = item.product.id {
                *required.entry(product_id.as_uuid()).or_insert(0) += u64::from(item.quantity);
            }
        }
        for (product_uuid, needed) in &required {
            if let Some(product) = tables.products.get(*product_uuid)
                && u64::from(product.count_in_stock) < *needed
            {
                return Err(RepositoryError::Validation(format!(
                    "insufficient stock for {}",
                    product.name
                )));
            }
        }

        // Every check passed; commit the whole order.
        for (product_uuid, needed) in required {
            let Some(product) = tables.products.get_mut(product_uuid) else {
                continue;
            };
            // Fits and never exceeds the stock; both verified above.
            product.count_in_stock = product
                .count_in_stock
                .saturating_sub(u32::try_from(needed).unwrap_or(u32::MAX));
        }

        let id = OrderId::generate();
        let now = Utc::now();
        let points_earned = pricing::points_earned(subtotal);
        let order = Order {
            id,
            user_id: new.user_id,
            items: new.items,
            shipping_address: new.shipping_address,
            payment_method: new.payment_method,
            total_price: new.total_price,
            shipping_price: new.shipping_price,
            points_earned,
            is_paid: true,
            status: OrderStatus::default(),
            created_at: now,
        };
        tables.orders.insert(id.as_uuid(), order.clone());

        ledger::apply_points(
            &mut tables,
            new.user_id,
            points_earned,
            LedgerSource::OrderCredit { order_id: id },
            now,
        )?;

        Ok(order)
    }

    /// List every order in insertion order.
    #[must_use]
    pub fn list_all(&self) -> Vec<Order> {
        self.db.read().orders.iter().cloned().collect()
    }

    /// List one buyer's orders in insertion order.
    ///
    /// An unknown buyer simply has no orders; this never fails.
    #[must_use]
    pub fn list_for_user(&self, user_id: UserId) -> Vec<Order> {
        self.db
            .read()
            .orders
            .iter()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Move an order to a new fulfillment status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such order exists.
    /// Returns `RepositoryError::InvalidTransition` if the transition table
    /// does not allow the step; terminal statuses allow none, intermediate
    /// statuses cannot be skipped, and self-transitions are rejected.
    pub fn update_status(
        &self,
        id: OrderId,
        next: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let mut tables = self.db.write();
        let order = tables
            .orders
            .get_mut(id.as_uuid())
            .ok_or(RepositoryError::NotFound)?;

        if !order.status.can_transition_to(next) {
            return Err(RepositoryError::InvalidTransition {
                from: order.status,
                to: next,
            });
        }
        order.status = next;

        Ok(order.clone())
    }
}

/// Sum of `price * quantity` over the item snapshots.
pub(crate) fn items_subtotal(items: &[OrderItem]) -> Result<Clp, RepositoryError> {
    let overflow = || RepositoryError::Validation("order amounts overflow".to_owned());

    let mut subtotal = Clp::ZERO;
    for item in items {
        let line = item.line_total().ok_or_else(overflow)?;
        subtotal = subtotal.checked_add(line).map_err(|_| overflow())?;
    }

    Ok(subtotal)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::db::products::tests::insert_test_product;
    use crate::db::users::tests::{insert_test_user, test_address};
    use crate::models::ProductSnapshot;

    pub(crate) fn plain_item(name: &str, price: i64, quantity: u32) -> OrderItem {
        OrderItem {
            product: ProductSnapshot {
                id: None,
                name: name.to_owned(),
                price: Clp::new(price).unwrap(),
            },
            quantity,
        }
    }

    fn order_for(user_id: UserId, items: Vec<OrderItem>) -> NewOrder {
        let subtotal: i64 = items
            .iter()
            .map(|i| i.product.price.as_i64() * i64::from(i.quantity))
            .sum();
        NewOrder {
            user_id,
            items,
            shipping_address: test_address(),
            payment_method: "WebPay".to_owned(),
            total_price: Clp::new(subtotal + 5_000).unwrap(),
            shipping_price: Clp::new(5_000).unwrap(),
        }
    }

    #[test]
    fn test_create_pending_paid_and_credited() {
        let db = Db::new();
        let repo = OrderRepository::new(&db);
        let user_id = insert_test_user(&db, "lucas@gmail.com", 0);

        let order = repo
            .create(order_for(user_id, vec![plain_item("Catan", 20_000, 1)]))
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.is_paid);
        assert_eq!(order.total_price.as_i64(), 25_000);
        assert_eq!(order.points_earned, 200);

        let tables = db.read();
        let user = tables.users.get(user_id.as_uuid()).unwrap();
        assert_eq!(user.points.as_i64(), 200);
        assert_eq!(tables.ledger.len(), 1);
    }

    #[test]
    fn test_create_rejects_empty_cart() {
        let db = Db::new();
        let repo = OrderRepository::new(&db);
        let user_id = insert_test_user(&db, "lucas@gmail.com", 0);

        let err = repo.create(order_for(user_id, Vec::new())).unwrap_err();
        assert!(matches!(err, RepositoryError::EmptyCart));
        assert!(repo.list_all().is_empty());
    }

    #[test]
    fn test_create_rejects_unknown_buyer() {
        let db = Db::new();
        let repo = OrderRepository::new(&db);

        let err = repo
            .create(order_for(
                UserId::generate(),
                vec![plain_item("Catan", 20_000, 1)],
            ))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn test_create_decrements_stock_once() {
        let db = Db::new();
        let repo = OrderRepository::new(&db);
        let user_id = insert_test_user(&db, "lucas@gmail.com", 0);
        let product_id = insert_test_product(&db, "PS5", 499_990, 5);

        let mut new = order_for(user_id, vec![plain_item("PS5", 499_990, 2)]);
        new.items.first_mut().unwrap().product.id = Some(product_id);
        repo.create(new).unwrap();

        let stock = db
            .read()
            .products
            .get(product_id.as_uuid())
            .unwrap()
            .count_in_stock;
        assert_eq!(stock, 3);
    }

    #[test]
    fn test_create_without_stock_commits_nothing() {
        let db = Db::new();
        let repo = OrderRepository::new(&db);
        let user_id = insert_test_user(&db, "lucas@gmail.com", 0);
        let product_id = insert_test_product(&db, "PS5", 499_990, 1);

        let mut new = order_for(user_id, vec![plain_item("PS5", 499_990, 2)]);
        new.items.first_mut().unwrap().product.id = Some(product_id);
        let err = repo.create(new).unwrap_err();

        assert!(matches!(err, RepositoryError::Validation(_)));
        let tables = db.read();
        assert_eq!(tables.orders.len(), 0);
        assert_eq!(tables.ledger.len(), 0);
        assert_eq!(
            tables.products.get(product_id.as_uuid()).unwrap().count_in_stock,
            1
        );
        assert!(tables.users.get(user_id.as_uuid()).unwrap().points.is_zero());
    }

    #[test]
    fn test_create_passes_unresolved_lines_through() {
        let db = Db::new();
        let repo = OrderRepository::new(&db);
        let user_id = insert_test_user(&db, "lucas@gmail.com", 0);

        // A line referencing a product that was deleted from the catalog.
        let mut item = plain_item("Juego retirado", 10_000, 1);
        item.product.id = Some(levelup_core::ProductId::generate());

        let order = repo.create(order_for(user_id, vec![item])).unwrap();
        assert_eq!(order.points_earned, 100);
    }

    #[test]
    fn test_status_walks_the_machine() {
        let db = Db::new();
        let repo = OrderRepository::new(&db);
        let user_id = insert_test_user(&db, "lucas@gmail.com", 0);
        let order = repo
            .create(order_for(user_id, vec![plain_item("Catan", 20_000, 1)]))
            .unwrap();

        repo.update_status(order.id, OrderStatus::Processing).unwrap();
        repo.update_status(order.id, OrderStatus::Shipped).unwrap();
        let delivered = repo
            .update_status(order.id, OrderStatus::Delivered)
            .unwrap();
        assert_eq!(delivered.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_status_rejects_skips_and_terminal_moves() {
        let db = Db::new();
        let repo = OrderRepository::new(&db);
        let user_id = insert_test_user(&db, "lucas@gmail.com", 0);
        let order = repo
            .create(order_for(user_id, vec![plain_item("Catan", 20_000, 1)]))
            .unwrap();

        // Pendiente -> Enviado skips Procesando.
        assert!(matches!(
            repo.update_status(order.id, OrderStatus::Shipped),
            Err(RepositoryError::InvalidTransition { .. })
        ));

        repo.update_status(order.id, OrderStatus::Cancelled).unwrap();
        let err = repo
            .update_status(order.id, OrderStatus::Processing)
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::InvalidTransition {
                from: OrderStatus::Cancelled,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_order_is_not_found() {
        let db = Db::new();
        assert!(matches!(
            OrderRepository::new(&db).update_status(OrderId::generate(), OrderStatus::Processing),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn test_list_for_user_filters() {
        let db = Db::new();
        let repo = OrderRepository::new(&db);
        let lucas = insert_test_user(&db, "lucas@gmail.com", 0);
        let ana = insert_test_user(&db, "ana@gmail.com", 0);

        repo.create(order_for(lucas, vec![plain_item("Catan", 20_000, 1)]))
            .unwrap();
        repo.create(order_for(ana, vec![plain_item("Dixit", 25_000, 1)]))
            .unwrap();
        repo.create(order_for(lucas, vec![plain_item("Azul", 30_000, 1)]))
            .unwrap();

        assert_eq!(repo.list_for_user(lucas).len(), 2);
        assert_eq!(repo.list_for_user(ana).len(), 1);
        assert!(repo.list_for_user(UserId::generate()).is_empty());
    }
}
