use chrono::Utc;
use fruit_porter_core::{OrderId, OrderItemId, OrderNumber, OrderStatus, UserId};
use rust_decimal::Decimal;

use crate::models::{Order, OrderItem};
use crate::store::query::{Predicate, Query};
use crate::store::views::{project_orders, OrderView};
use crate::store::Database;

#[derive(Debug)]
pub struct NewOrder {
    pub order_number: OrderNumber,
    pub user_id: UserId,
    pub total_amount: Decimal,
    pub shipping_name: String,
    pub shipping_phone: String,
    pub shipping_address: String,
    pub notes: Option<String>,
}

#[derive(Debug)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: fruit_porter_core::ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Admin order listing filters; paging applies after filtering.
#[derive(Debug, Default)]
pub struct OrderListFilter {
    pub status: Option<OrderStatus>,
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: usize,
}

pub struct OrderRepository<'a> {
    db: &'a mut Database,
}

impl<'a> OrderRepository<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    /// Inserts a new order in `pending` status.
    pub fn insert(&mut self, new_order: NewOrder) -> OrderId {
        let id = self.db.issue_order_id();
        self.db.orders.push(Order {
            id,
            order_number: new_order.order_number,
            user_id: new_order.user_id,
            total_amount: new_order.total_amount,
            status: OrderStatus::Pending,
            shipping_name: new_order.shipping_name,
            shipping_phone: new_order.shipping_phone,
            shipping_address: new_order.shipping_address,
            notes: new_order.notes,
            cancel_reason: None,
            admin_note: None,
            created_at: Utc::now(),
        });
        id
    }

    pub fn insert_item(&mut self, new_item: NewOrderItem) -> OrderItemId {
        let id = self.db.issue_order_item_id();
        self.db.order_items.push(OrderItem {
            id,
            order_id: new_item.order_id,
            product_id: new_item.product_id,
            product_name: new_item.product_name,
            quantity: new_item.quantity,
            unit_price: new_item.unit_price,
        });
        id
    }

    pub fn find(&self, id: OrderId) -> Option<OrderView> {
        Query::new()
            .filter(Predicate::IdEq(id.as_i32()))
            .run_one(&project_orders(self.db))
    }

    /// The order only if it belongs to `user_id`.
    pub fn find_for_user(&self, id: OrderId, user_id: UserId) -> Option<OrderView> {
        Query::new()
            .filter(Predicate::IdEq(id.as_i32()))
            .filter(Predicate::UserEq(user_id))
            .run_one(&project_orders(self.db))
    }

    pub fn find_by_order_number(&self, number: &OrderNumber) -> Option<Order> {
        Query::new()
            .filter(Predicate::OrderNumberEq(number.clone()))
            .run_one(&self.db.orders)
    }

    pub fn list_for_user(&self, user_id: UserId) -> Vec<OrderView> {
        Query::new()
            .filter(Predicate::UserEq(user_id))
            .newest_first()
            .run(&project_orders(self.db))
    }

    pub fn completed_for_user(&self, user_id: UserId) -> Vec<OrderView> {
        Query::new()
            .filter(Predicate::UserEq(user_id))
            .filter(Predicate::StatusEq(OrderStatus::Completed))
            .newest_first()
            .run(&project_orders(self.db))
    }

    /// Admin listing with optional status filter and free-text search
    /// over order number, customer name and shipping name. Returns the
    /// page plus the total match count before paging.
    pub fn admin_list(&self, filter: &OrderListFilter) -> (Vec<OrderView>, usize) {
        let mut query = Query::new().newest_first();
        if let Some(status) = filter.status {
            query = query.filter(Predicate::StatusEq(status));
        }
        let mut matched = query.run(&project_orders(self.db));
        if let Some(needle) = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let needle = needle.to_lowercase();
            matched.retain(|view| {
                view.order
                    .order_number
                    .as_str()
                    .to_lowercase()
                    .contains(&needle)
                    || view
                        .customer_name
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle))
                    || view.order.shipping_name.to_lowercase().contains(&needle)
            });
        }
        let total = matched.len();
        let mut page: Vec<_> = matched.into_iter().skip(filter.offset).collect();
        if let Some(limit) = filter.limit {
            page.truncate(limit);
        }
        (page, total)
    }

    pub fn recent(&self, limit: usize) -> Vec<OrderView> {
        Query::new()
            .newest_first()
            .limit(limit)
            .run(&project_orders(self.db))
    }

    pub fn items(&self, order_id: OrderId) -> Vec<OrderItem> {
        Query::new()
            .filter(Predicate::OrderEq(order_id))
            .run(&self.db.order_items)
    }

    pub fn set_status(&mut self, id: OrderId, status: OrderStatus) -> usize {
        self.db
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .map_or(0, |order| {
                order.status = status;
                1
            })
    }

    /// Marks an order cancelled, recording why.
    pub fn cancel(
        &mut self,
        id: OrderId,
        cancel_reason: Option<String>,
        admin_note: Option<String>,
    ) -> usize {
        self.db
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .map_or(0, |order| {
                order.status = OrderStatus::Cancelled;
                order.cancel_reason = cancel_reason;
                if admin_note.is_some() {
                    order.admin_note = admin_note;
                }
                1
            })
    }

    pub fn set_admin_note(&mut self, id: OrderId, note: String) -> usize {
        self.db
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .map_or(0, |order| {
                order.admin_note = Some(note);
                1
            })
    }

    pub fn delete(&mut self, id: OrderId) -> usize {
        let before = self.db.orders.len();
        self.db.orders.retain(|o| o.id != id);
        before - self.db.orders.len()
    }

    pub fn delete_items_for_order(&mut self, order_id: OrderId) -> usize {
        let before = self.db.order_items.len();
        self.db.order_items.retain(|item| item.order_id != order_id);
        before - self.db.order_items.len()
    }

    pub fn count(&self) -> usize {
        self.db.orders.len()
    }

    pub fn count_with_status(&self, status: OrderStatus) -> usize {
        self.db.orders.iter().filter(|o| o.status == status).count()
    }

    /// Revenue across all non-cancelled orders.
    pub fn total_revenue(&self) -> Decimal {
        self.db
            .orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.total_amount)
            .sum()
    }
}
