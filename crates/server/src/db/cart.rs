use chrono::Utc;
use fruit_porter_core::{CartItemId, ProductId, UserId};

use crate::models::CartItem;
use crate::store::query::{Predicate, Query};
use crate::store::views::{project_cart_items, CartItemView};
use crate::store::Database;

#[derive(Debug)]
pub struct NewCartItem {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
}

pub struct CartRepository<'a> {
    db: &'a mut Database,
}

impl<'a> CartRepository<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    pub fn insert(&mut self, new_item: NewCartItem) -> CartItemId {
        let id = self.db.issue_cart_item_id();
        self.db.cart_items.push(CartItem {
            id,
            user_id: new_item.user_id,
            product_id: new_item.product_id,
            quantity: new_item.quantity,
            created_at: Utc::now(),
        });
        id
    }

    /// A user's cart joined with live product data, newest line first.
    pub fn lines_for_user(&self, user_id: UserId) -> Vec<CartItemView> {
        Query::new()
            .filter(Predicate::UserEq(user_id))
            .newest_first()
            .run(&project_cart_items(self.db))
    }

    pub fn find_line(&self, id: CartItemId) -> Option<CartItemView> {
        Query::new()
            .filter(Predicate::IdEq(id.as_i32()))
            .run_one(&project_cart_items(self.db))
    }

    /// The existing line for a `(user, product)` pair, if any.
    pub fn find_by_user_and_product(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Option<CartItem> {
        Query::new()
            .filter(Predicate::UserEq(user_id))
            .filter(Predicate::ProductEq(product_id))
            .run_one(&self.db.cart_items)
    }

    pub fn set_quantity(&mut self, id: CartItemId, quantity: i32) -> usize {
        self.db
            .cart_items
            .iter_mut()
            .find(|line| line.id == id)
            .map_or(0, |line| {
                line.quantity = quantity;
                1
            })
    }

    pub fn delete(&mut self, id: CartItemId) -> usize {
        let before = self.db.cart_items.len();
        self.db.cart_items.retain(|line| line.id != id);
        before - self.db.cart_items.len()
    }

    /// Empties a user's cart, returning the number of lines removed.
    pub fn clear_user(&mut self, user_id: UserId) -> usize {
        let before = self.db.cart_items.len();
        self.db.cart_items.retain(|line| line.user_id != user_id);
        before - self.db.cart_items.len()
    }
}
