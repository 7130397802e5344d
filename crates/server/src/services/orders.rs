//! Checkout, cancellation and order lifecycle.
//!
//! Every entry point runs inside one transaction held by the caller:
//! stock checks, credit checks and the writes they guard cannot be
//! interleaved with other requests. Orders are paid entirely from
//! store credit.

use chrono::Utc;
use fruit_porter_core::{AccountStatus, OrderId, OrderNumber, OrderStatus, UserId};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::{
    CartRepository, NewOrder, NewOrderItem, OrderRepository, ProductRepository, UserRepository,
};
use crate::store::views::OrderView;
use crate::store::Database;

/// Orders at or above this subtotal ship for free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(799, 0, 0, false, 0);
/// Flat shipping fee below the threshold.
pub const SHIPPING_FEE: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("account not found")]
    UnknownUser,
    #[error("this account has been suspended")]
    AccountSuspended,
    #[error("cart is empty")]
    EmptyCart,
    #[error("shipping name, phone and address are required")]
    MissingShipping,
    #[error("insufficient stock for {0}")]
    InsufficientStock(String),
    #[error("insufficient credit")]
    InsufficientCredit,
    #[error("order not found")]
    NotFound,
    #[error("a cancellation reason is required")]
    ReasonRequired,
    #[error("only pending orders can be cancelled")]
    NotCancellable,
    #[error("only completed or cancelled orders can be removed")]
    NotDeletable,
}

/// Shipping details captured at checkout.
#[derive(Debug)]
pub struct Checkout {
    pub shipping_name: String,
    pub shipping_phone: String,
    pub shipping_address: String,
    pub notes: Option<String>,
}

/// Aggregated purchase history for one account.
#[derive(Debug, Serialize)]
pub struct HistorySummary {
    pub orders: Vec<OrderView>,
    pub total_spent: Decimal,
    pub product_stats: Vec<ProductStat>,
}

/// Per-product totals across an account's completed orders.
#[derive(Debug, Serialize)]
pub struct ProductStat {
    pub product_id: fruit_porter_core::ProductId,
    pub name: String,
    pub total_quantity: i64,
    pub total_spent: Decimal,
}

pub struct OrderService<'a> {
    db: &'a mut Database,
}

impl<'a> OrderService<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    /// Turns the user's cart into a pending order.
    ///
    /// Checks stock line by line and credit against the grand total,
    /// then snapshots each line, deducts stock and credit, and clears
    /// the cart. Any failure before that point leaves the store
    /// untouched.
    pub fn place_order(
        &mut self,
        user_id: UserId,
        checkout: &Checkout,
    ) -> Result<OrderView, OrderError> {
        let user = UserRepository::new(self.db)
            .find_by_id(user_id)
            .ok_or(OrderError::UnknownUser)?;
        if user.status == AccountStatus::Suspended {
            return Err(OrderError::AccountSuspended);
        }

        let shipping_name = checkout.shipping_name.trim();
        let shipping_phone = checkout.shipping_phone.trim();
        let shipping_address = checkout.shipping_address.trim();
        if shipping_name.is_empty() || shipping_phone.is_empty() || shipping_address.is_empty() {
            return Err(OrderError::MissingShipping);
        }

        let lines = CartRepository::new(self.db).lines_for_user(user_id);
        if lines.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let mut subtotal = Decimal::ZERO;
        for line in &lines {
            let name = line.name.clone().unwrap_or_else(|| "unknown product".to_owned());
            let (stock, price) = match (line.stock, line.price) {
                (Some(stock), Some(price)) => (stock, price),
                // The product was removed after the line was added.
                _ => return Err(OrderError::InsufficientStock(name)),
            };
            if stock < line.quantity {
                return Err(OrderError::InsufficientStock(name));
            }
            subtotal += price * Decimal::from(line.quantity);
        }

        let shipping_fee = if subtotal >= FREE_SHIPPING_THRESHOLD {
            Decimal::ZERO
        } else {
            SHIPPING_FEE
        };
        let total = subtotal + shipping_fee;
        if user.credit < total {
            return Err(OrderError::InsufficientCredit);
        }

        let order_number = self.unique_order_number();
        let order_id = OrderRepository::new(self.db).insert(NewOrder {
            order_number,
            user_id,
            total_amount: total,
            shipping_name: shipping_name.to_owned(),
            shipping_phone: shipping_phone.to_owned(),
            shipping_address: shipping_address.to_owned(),
            notes: checkout.notes.clone().filter(|n| !n.trim().is_empty()),
        });

        for line in &lines {
            OrderRepository::new(self.db).insert_item(NewOrderItem {
                order_id,
                product_id: line.product_id,
                product_name: line
                    .name
                    .clone()
                    .unwrap_or_else(|| "unknown product".to_owned()),
                quantity: line.quantity,
                unit_price: line.price.unwrap_or(Decimal::ZERO),
            });
            ProductRepository::new(self.db).adjust_stock(line.product_id, -line.quantity);
        }
        UserRepository::new(self.db).adjust_credit(user_id, -total);
        CartRepository::new(self.db).clear_user(user_id);

        OrderRepository::new(self.db)
            .find(order_id)
            .ok_or(OrderError::NotFound)
    }

    /// Cancels a pending order, restoring stock and refunding credit.
    pub fn cancel_order(
        &mut self,
        user_id: UserId,
        order_id: OrderId,
        reason: &str,
    ) -> Result<OrderView, OrderError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(OrderError::ReasonRequired);
        }
        let view = OrderRepository::new(self.db)
            .find_for_user(order_id, user_id)
            .ok_or(OrderError::NotFound)?;
        if !view.order.status.is_cancellable() {
            return Err(OrderError::NotCancellable);
        }
        self.restock_and_refund(order_id, view.order.user_id, view.order.total_amount);
        OrderRepository::new(self.db).cancel(order_id, Some(reason.to_owned()), None);
        OrderRepository::new(self.db)
            .find(order_id)
            .ok_or(OrderError::NotFound)
    }

    /// Admin status change. Moving an order into `cancelled` restores
    /// stock and refunds credit exactly once; the recorded reason
    /// defaults to "cancelled by staff" when none is supplied.
    pub fn set_status(
        &mut self,
        order_id: OrderId,
        status: OrderStatus,
        cancel_reason: Option<String>,
        admin_note: Option<String>,
    ) -> Result<OrderView, OrderError> {
        let view = OrderRepository::new(self.db)
            .find(order_id)
            .ok_or(OrderError::NotFound)?;
        if status == OrderStatus::Cancelled && view.order.status != OrderStatus::Cancelled {
            let reason = cancel_reason
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| "cancelled by staff".to_owned());
            self.restock_and_refund(order_id, view.order.user_id, view.order.total_amount);
            OrderRepository::new(self.db).cancel(order_id, Some(reason), None);
        } else {
            OrderRepository::new(self.db).set_status(order_id, status);
        }
        if let Some(note) = admin_note.filter(|n| !n.trim().is_empty()) {
            OrderRepository::new(self.db).set_admin_note(order_id, note);
        }
        OrderRepository::new(self.db)
            .find(order_id)
            .ok_or(OrderError::NotFound)
    }

    /// Removes a finished order from the user's history.
    pub fn delete_order(&mut self, user_id: UserId, order_id: OrderId) -> Result<(), OrderError> {
        let view = OrderRepository::new(self.db)
            .find_for_user(order_id, user_id)
            .ok_or(OrderError::NotFound)?;
        if !view.order.status.is_terminal() {
            return Err(OrderError::NotDeletable);
        }
        let mut orders = OrderRepository::new(self.db);
        orders.delete_items_for_order(order_id);
        orders.delete(order_id);
        Ok(())
    }

    /// Removes every finished order from the user's history, returning
    /// how many were removed.
    pub fn clear_finished_orders(&mut self, user_id: UserId) -> usize {
        let finished: Vec<OrderId> = OrderRepository::new(self.db)
            .list_for_user(user_id)
            .into_iter()
            .filter(|view| view.order.status.is_terminal())
            .map(|view| view.order.id)
            .collect();
        let mut orders = OrderRepository::new(self.db);
        for order_id in &finished {
            orders.delete_items_for_order(*order_id);
            orders.delete(*order_id);
        }
        finished.len()
    }

    /// Purchase history across completed orders, with per-product
    /// totals ranked by units bought.
    pub fn history_summary(&mut self, user_id: UserId) -> HistorySummary {
        use std::collections::BTreeMap;

        let orders_repo = OrderRepository::new(self.db);
        let orders = orders_repo.completed_for_user(user_id);
        let total_spent = orders.iter().map(|view| view.order.total_amount).sum();

        let mut stats: BTreeMap<fruit_porter_core::ProductId, ProductStat> = BTreeMap::new();
        for view in &orders {
            for item in orders_repo.items(view.order.id) {
                let entry = stats.entry(item.product_id).or_insert_with(|| ProductStat {
                    product_id: item.product_id,
                    name: item.product_name.clone(),
                    total_quantity: 0,
                    total_spent: Decimal::ZERO,
                });
                entry.total_quantity += i64::from(item.quantity);
                entry.total_spent += item.unit_price * Decimal::from(item.quantity);
            }
        }
        let mut product_stats: Vec<_> = stats.into_values().collect();
        product_stats.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));

        HistorySummary {
            orders,
            total_spent,
            product_stats,
        }
    }

    fn restock_and_refund(&mut self, order_id: OrderId, user_id: UserId, total: Decimal) {
        let items = OrderRepository::new(self.db).items(order_id);
        for item in items {
            ProductRepository::new(self.db).adjust_stock(item.product_id, item.quantity);
        }
        UserRepository::new(self.db).adjust_credit(user_id, total);
    }

    /// Order numbers are random; on the off chance of a collision,
    /// draw again.
    fn unique_order_number(&mut self) -> OrderNumber {
        loop {
            let candidate = OrderNumber::generate(Utc::now());
            if OrderRepository::new(self.db)
                .find_by_order_number(&candidate)
                .is_none()
            {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use fruit_porter_core::ProductId;

    use crate::db::NewCartItem;
    use crate::store::seed;

    use super::*;

    fn demo_user(db: &mut Database) -> UserId {
        db.users
            .iter()
            .find(|u| u.email.as_str() == seed::DEMO_EMAIL)
            .map(|u| u.id)
            .expect("demo account is seeded")
    }

    fn checkout() -> Checkout {
        Checkout {
            shipping_name: "Demo User".to_owned(),
            shipping_phone: "555-0100".to_owned(),
            shipping_address: "12 Orchard Lane".to_owned(),
            notes: None,
        }
    }

    fn add_to_cart(db: &mut Database, user_id: UserId, product_id: i32, quantity: i32) {
        CartRepository::new(db).insert(NewCartItem {
            user_id,
            product_id: ProductId::new(product_id),
            quantity,
        });
    }

    #[test]
    fn checkout_snapshots_lines_and_deducts_stock_and_credit() {
        let mut db = Database::seeded();
        let user_id = demo_user(&mut db);
        add_to_cart(&mut db, user_id, 1, 2); // Honeycrisp Apples at 45.00
        let stock_before = db.products.first().map(|p| p.stock).unwrap_or_default();

        let view = OrderService::new(&mut db)
            .place_order(user_id, &checkout())
            .expect("checkout succeeds");

        // Subtotal 90.00 is under the threshold, so shipping applies.
        assert_eq!(view.order.total_amount, Decimal::new(19000, 2));
        assert_eq!(view.order.status, OrderStatus::Pending);
        assert!(view.order.order_number.as_str().starts_with("FP"));

        let stock_after = db.products.first().map(|p| p.stock).unwrap_or_default();
        assert_eq!(stock_after, stock_before - 2);
        let credit = db
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.credit)
            .unwrap_or_default();
        assert_eq!(credit, Decimal::from(10_000) - Decimal::new(19000, 2));
        assert!(db.cart_items.is_empty());
        assert_eq!(db.order_items.len(), 1);
    }

    #[test]
    fn subtotal_at_threshold_ships_free() {
        let mut db = Database::seeded();
        let user_id = demo_user(&mut db);
        // Four classic crates at 199.00 come to 796.00; add bananas to clear 799.
        add_to_cart(&mut db, user_id, 11, 4);
        add_to_cart(&mut db, user_id, 8, 1);
        let view = OrderService::new(&mut db)
            .place_order(user_id, &checkout())
            .expect("checkout succeeds");
        // 796.00 + 18.00 = 814.00, no fee added.
        assert_eq!(view.order.total_amount, Decimal::new(81400, 2));
    }

    #[test]
    fn insufficient_stock_aborts_without_side_effects() {
        let mut db = Database::seeded();
        let user_id = demo_user(&mut db);
        add_to_cart(&mut db, user_id, 12, 26); // only 25 deluxe crates in stock
        let credit_before = db
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.credit)
            .unwrap_or_default();

        let result = OrderService::new(&mut db).place_order(user_id, &checkout());
        assert!(matches!(result, Err(OrderError::InsufficientStock(_))));

        let credit_after = db
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.credit)
            .unwrap_or_default();
        assert_eq!(credit_before, credit_after);
        assert_eq!(db.cart_items.len(), 1);
        assert!(db.orders.is_empty());
    }

    #[test]
    fn insufficient_credit_aborts_checkout() {
        let mut db = Database::seeded();
        let user_id = demo_user(&mut db);
        // 40 classic crates plus 25 deluxe crates come to 17935.00,
        // within stock but far over the demo account's 10000 credit.
        add_to_cart(&mut db, user_id, 11, 40);
        add_to_cart(&mut db, user_id, 12, 25);
        let result = OrderService::new(&mut db).place_order(user_id, &checkout());
        assert!(matches!(result, Err(OrderError::InsufficientCredit)));
        assert!(db.orders.is_empty());
    }

    #[test]
    fn empty_cart_cannot_check_out() {
        let mut db = Database::seeded();
        let user_id = demo_user(&mut db);
        let result = OrderService::new(&mut db).place_order(user_id, &checkout());
        assert!(matches!(result, Err(OrderError::EmptyCart)));
    }

    #[test]
    fn cancelling_a_pending_order_restores_stock_and_credit() {
        let mut db = Database::seeded();
        let user_id = demo_user(&mut db);
        add_to_cart(&mut db, user_id, 1, 2);
        let stock_before = db.products.first().map(|p| p.stock).unwrap_or_default();
        let credit_before = db
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.credit)
            .unwrap_or_default();

        let placed = OrderService::new(&mut db)
            .place_order(user_id, &checkout())
            .expect("checkout succeeds");
        let cancelled = OrderService::new(&mut db)
            .cancel_order(user_id, placed.order.id, "ordered by mistake")
            .expect("cancellation succeeds");

        assert_eq!(cancelled.order.status, OrderStatus::Cancelled);
        assert_eq!(
            cancelled.order.cancel_reason.as_deref(),
            Some("ordered by mistake")
        );
        assert_eq!(
            db.products.first().map(|p| p.stock).unwrap_or_default(),
            stock_before
        );
        assert_eq!(
            db.users
                .iter()
                .find(|u| u.id == user_id)
                .map(|u| u.credit)
                .unwrap_or_default(),
            credit_before
        );
    }

    #[test]
    fn cancellation_requires_a_reason() {
        let mut db = Database::seeded();
        let user_id = demo_user(&mut db);
        add_to_cart(&mut db, user_id, 1, 1);
        let placed = OrderService::new(&mut db)
            .place_order(user_id, &checkout())
            .expect("checkout succeeds");
        let result = OrderService::new(&mut db).cancel_order(user_id, placed.order.id, "   ");
        assert!(matches!(result, Err(OrderError::ReasonRequired)));
    }

    #[test]
    fn only_pending_orders_can_be_cancelled_by_the_customer() {
        let mut db = Database::seeded();
        let user_id = demo_user(&mut db);
        add_to_cart(&mut db, user_id, 1, 1);
        let placed = OrderService::new(&mut db)
            .place_order(user_id, &checkout())
            .expect("checkout succeeds");
        OrderRepository::new(&mut db).set_status(placed.order.id, OrderStatus::Shipped);
        let result =
            OrderService::new(&mut db).cancel_order(user_id, placed.order.id, "too late");
        assert!(matches!(result, Err(OrderError::NotCancellable)));
    }

    #[test]
    fn staff_cancellation_refunds_exactly_once() {
        let mut db = Database::seeded();
        let user_id = demo_user(&mut db);
        add_to_cart(&mut db, user_id, 1, 1);
        let placed = OrderService::new(&mut db)
            .place_order(user_id, &checkout())
            .expect("checkout succeeds");
        let credit_after_checkout = db
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.credit)
            .unwrap_or_default();

        OrderService::new(&mut db)
            .set_status(placed.order.id, OrderStatus::Cancelled, None, None)
            .expect("first cancellation succeeds");
        OrderService::new(&mut db)
            .set_status(placed.order.id, OrderStatus::Cancelled, None, None)
            .expect("second call is a no-op");

        let credit_final = db
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.credit)
            .unwrap_or_default();
        assert_eq!(
            credit_final,
            credit_after_checkout + placed.order.total_amount
        );
    }

    #[test]
    fn staff_cancellation_records_supplied_or_default_reason() {
        let mut db = Database::seeded();
        let user_id = demo_user(&mut db);
        add_to_cart(&mut db, user_id, 1, 1);
        let placed = OrderService::new(&mut db)
            .place_order(user_id, &checkout())
            .expect("checkout succeeds");

        let cancelled = OrderService::new(&mut db)
            .set_status(
                placed.order.id,
                OrderStatus::Cancelled,
                Some("payment flagged".to_owned()),
                None,
            )
            .expect("cancellation succeeds");
        assert_eq!(
            cancelled.order.cancel_reason.as_deref(),
            Some("payment flagged")
        );

        add_to_cart(&mut db, user_id, 1, 1);
        let second = OrderService::new(&mut db)
            .place_order(user_id, &checkout())
            .expect("checkout succeeds");
        let cancelled = OrderService::new(&mut db)
            .set_status(second.order.id, OrderStatus::Cancelled, None, None)
            .expect("cancellation succeeds");
        assert_eq!(
            cancelled.order.cancel_reason.as_deref(),
            Some("cancelled by staff")
        );
    }

    #[test]
    fn only_finished_orders_can_be_deleted() {
        let mut db = Database::seeded();
        let user_id = demo_user(&mut db);
        add_to_cart(&mut db, user_id, 1, 1);
        let placed = OrderService::new(&mut db)
            .place_order(user_id, &checkout())
            .expect("checkout succeeds");

        let pending = OrderService::new(&mut db).delete_order(user_id, placed.order.id);
        assert!(matches!(pending, Err(OrderError::NotDeletable)));

        OrderRepository::new(&mut db).set_status(placed.order.id, OrderStatus::Completed);
        OrderService::new(&mut db)
            .delete_order(user_id, placed.order.id)
            .expect("finished order deletes");
        assert!(db.orders.is_empty());
        assert!(db.order_items.is_empty());
    }

    #[test]
    fn history_summary_ranks_products_by_units() {
        let mut db = Database::seeded();
        let user_id = demo_user(&mut db);
        add_to_cart(&mut db, user_id, 1, 3);
        add_to_cart(&mut db, user_id, 8, 1);
        let placed = OrderService::new(&mut db)
            .place_order(user_id, &checkout())
            .expect("checkout succeeds");
        OrderRepository::new(&mut db).set_status(placed.order.id, OrderStatus::Completed);

        let summary = OrderService::new(&mut db).history_summary(user_id);
        assert_eq!(summary.orders.len(), 1);
        assert_eq!(summary.total_spent, placed.order.total_amount);
        assert_eq!(
            summary
                .product_stats
                .first()
                .map(|stat| stat.name.as_str()),
            Some("Honeycrisp Apples")
        );
    }
}
