//! Typed row filtering.
//!
//! [`Query`] is the one read path over table vectors: a conjunction of
//! [`Predicate`]s, optionally reversed into newest-first order and
//! capped. The predicate catalog is a closed enum, so a filter that no
//! row type understands is a compile error rather than a silently
//! ignored clause.

use fruit_porter_core::{
    CategoryId, Email, OrderId, OrderNumber, OrderStatus, ProductId, UserId,
};

use crate::models::{CartItem, Category, Favorite, Order, OrderItem, Setting, User};
use crate::store::views::{CartItemView, FavoriteView, OrderView, ProductView};

/// One filter clause. Each variant compares a single column for
/// equality; a row type matches only the variants naming its columns.
#[derive(Debug, Clone)]
pub enum Predicate {
    IdEq(i32),
    EmailEq(Email),
    UserEq(UserId),
    KeyEq(String),
    IsAdmin(bool),
    Featured,
    Seasonal,
    StatusEq(OrderStatus),
    CategoryEq(CategoryId),
    ProductEq(ProductId),
    OrderEq(OrderId),
    OrderNumberEq(OrderNumber),
}

/// Row types that can be tested against a [`Predicate`].
///
/// A predicate naming a column the type does not have never matches;
/// combined with conjunctive evaluation this makes such a query return
/// nothing instead of everything.
pub trait Matchable {
    fn matches(&self, predicate: &Predicate) -> bool;
}

/// A filter over one table: every predicate must hold.
#[derive(Debug, Clone, Default)]
pub struct Query {
    predicates: Vec<Predicate>,
    newest_first: bool,
    limit: Option<usize>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a clause. Clauses combine conjunctively.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Returns rows in reverse insertion order. Insertion order tracks
    /// id order, so this is also newest-id-first.
    #[must_use]
    pub const fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    /// Caps the result, applied after ordering.
    #[must_use]
    pub const fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Runs the query over a table, cloning the matching rows.
    pub fn run<T: Matchable + Clone>(&self, rows: &[T]) -> Vec<T> {
        let mut out: Vec<T> = rows
            .iter()
            .filter(|row| self.predicates.iter().all(|p| row.matches(p)))
            .cloned()
            .collect();
        if self.newest_first {
            out.reverse();
        }
        if let Some(n) = self.limit {
            out.truncate(n);
        }
        out
    }

    /// Runs the query and keeps only the first match.
    pub fn run_one<T: Matchable + Clone>(&self, rows: &[T]) -> Option<T> {
        rows.iter()
            .find(|row| self.predicates.iter().all(|p| row.matches(p)))
            .cloned()
    }
}

impl Matchable for User {
    fn matches(&self, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::IdEq(id) => self.id.as_i32() == *id,
            Predicate::EmailEq(email) => self.email == *email,
            Predicate::IsAdmin(flag) => self.is_admin == *flag,
            _ => false,
        }
    }
}

impl Matchable for Category {
    fn matches(&self, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::IdEq(id) => self.id.as_i32() == *id,
            _ => false,
        }
    }
}

impl Matchable for CartItem {
    fn matches(&self, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::IdEq(id) => self.id.as_i32() == *id,
            Predicate::UserEq(user_id) => self.user_id == *user_id,
            Predicate::ProductEq(product_id) => self.product_id == *product_id,
            _ => false,
        }
    }
}

impl Matchable for Order {
    fn matches(&self, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::IdEq(id) => self.id.as_i32() == *id,
            Predicate::UserEq(user_id) => self.user_id == *user_id,
            Predicate::StatusEq(status) => self.status == *status,
            Predicate::OrderNumberEq(number) => self.order_number == *number,
            _ => false,
        }
    }
}

impl Matchable for OrderItem {
    fn matches(&self, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::IdEq(id) => self.id.as_i32() == *id,
            Predicate::OrderEq(order_id) => self.order_id == *order_id,
            Predicate::ProductEq(product_id) => self.product_id == *product_id,
            _ => false,
        }
    }
}

impl Matchable for Favorite {
    fn matches(&self, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::IdEq(id) => self.id.as_i32() == *id,
            Predicate::UserEq(user_id) => self.user_id == *user_id,
            Predicate::ProductEq(product_id) => self.product_id == *product_id,
            _ => false,
        }
    }
}

impl Matchable for Setting {
    fn matches(&self, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::IdEq(id) => self.id.as_i32() == *id,
            Predicate::KeyEq(key) => self.key == *key,
            _ => false,
        }
    }
}

impl Matchable for ProductView {
    fn matches(&self, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::IdEq(id) => self.product.id.as_i32() == *id,
            Predicate::CategoryEq(category_id) => self.product.category_id == Some(*category_id),
            Predicate::Featured => self.product.is_featured,
            Predicate::Seasonal => self.product.is_seasonal,
            _ => false,
        }
    }
}

impl Matchable for CartItemView {
    fn matches(&self, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::IdEq(id) => self.id.as_i32() == *id,
            Predicate::UserEq(user_id) => self.user_id == *user_id,
            Predicate::ProductEq(product_id) => self.product_id == *product_id,
            _ => false,
        }
    }
}

impl Matchable for OrderView {
    fn matches(&self, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::IdEq(id) => self.order.id.as_i32() == *id,
            Predicate::UserEq(user_id) => self.order.user_id == *user_id,
            Predicate::StatusEq(status) => self.order.status == *status,
            Predicate::OrderNumberEq(number) => self.order.order_number == *number,
            _ => false,
        }
    }
}

impl Matchable for FavoriteView {
    fn matches(&self, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::IdEq(id) => self.id.as_i32() == *id,
            Predicate::UserEq(user_id) => self.user_id == *user_id,
            Predicate::ProductEq(product_id) => self.product_id == *product_id,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use fruit_porter_core::{CartItemId, ProductId, UserId};

    use super::*;

    fn cart_item(id: i32, user: i32, product: i32, quantity: i32) -> CartItem {
        CartItem {
            id: CartItemId::new(id),
            user_id: UserId::new(user),
            product_id: ProductId::new(product),
            quantity,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn clauses_combine_conjunctively() {
        let rows = vec![
            cart_item(1, 7, 3, 1),
            cart_item(2, 7, 4, 2),
            cart_item(3, 8, 3, 1),
        ];
        let matched = Query::new()
            .filter(Predicate::UserEq(UserId::new(7)))
            .filter(Predicate::ProductEq(ProductId::new(3)))
            .run(&rows);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched.first().map(|row| row.id), Some(CartItemId::new(1)));
    }

    #[test]
    fn empty_query_returns_every_row() {
        let rows = vec![cart_item(1, 7, 3, 1), cart_item(2, 8, 4, 2)];
        assert_eq!(Query::new().run(&rows).len(), 2);
    }

    #[test]
    fn predicate_for_a_missing_column_matches_nothing() {
        let rows = vec![cart_item(1, 7, 3, 1)];
        // Cart lines have no `key` column, so a key clause excludes all.
        let matched = Query::new()
            .filter(Predicate::KeyEq("current_theme".to_owned()))
            .run(&rows);
        assert!(matched.is_empty());
    }

    #[test]
    fn newest_first_reverses_and_limit_truncates() {
        let rows = vec![
            cart_item(1, 7, 3, 1),
            cart_item(2, 7, 4, 2),
            cart_item(3, 7, 5, 3),
        ];
        let matched = Query::new()
            .filter(Predicate::UserEq(UserId::new(7)))
            .newest_first()
            .limit(2)
            .run(&rows);
        let ids: Vec<_> = matched.iter().map(|row| row.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 2]);
    }
}
