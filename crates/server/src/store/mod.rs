//! In-memory relational store.
//!
//! [`Database`] holds every table as a `Vec` of rows plus the id
//! counters that back insertion. It is wrapped in [`Store`], a cheap
//! cloneable handle that hands out one [`Transaction`] at a time.
//!
//! A transaction is the exclusive guard over the whole database:
//! handlers acquire it, run their reads and writes through the
//! repositories, and release it before producing a response. Holding it
//! across an `.await` would pin the guard in a non-`Send` future, so
//! all work inside a transaction is synchronous.

pub mod query;
pub mod seed;
pub mod views;

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fruit_porter_core::{
    CartItemId, CategoryId, FavoriteId, OrderId, OrderItemId, ProductId, SettingId, UserId,
};

use crate::models::{CartItem, Category, Favorite, Order, OrderItem, Product, Setting, User};

/// All tables of the store.
#[derive(Debug, Default)]
pub struct Database {
    pub users: Vec<User>,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub cart_items: Vec<CartItem>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub favorites: Vec<Favorite>,
    pub settings: Vec<Setting>,
    next_ids: NextIds,
}

/// Last id issued per table. Ids start at 1 and never repeat, even
/// after the row they were issued for is deleted.
#[derive(Debug, Default)]
struct NextIds {
    users: i32,
    categories: i32,
    products: i32,
    cart_items: i32,
    orders: i32,
    order_items: i32,
    favorites: i32,
    settings: i32,
}

macro_rules! issue_id {
    ($fn_name:ident, $field:ident, $id:ty) => {
        pub(crate) fn $fn_name(&mut self) -> $id {
            self.next_ids.$field += 1;
            <$id>::new(self.next_ids.$field)
        }
    };
}

impl Database {
    /// An empty database with all id counters at zero.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A database loaded with the demo catalog, accounts and settings.
    #[must_use]
    pub fn seeded() -> Self {
        let mut db = Self::empty();
        seed::populate(&mut db);
        db
    }

    issue_id!(issue_user_id, users, UserId);
    issue_id!(issue_category_id, categories, CategoryId);
    issue_id!(issue_product_id, products, ProductId);
    issue_id!(issue_cart_item_id, cart_items, CartItemId);
    issue_id!(issue_order_id, orders, OrderId);
    issue_id!(issue_order_item_id, order_items, OrderItemId);
    issue_id!(issue_favorite_id, favorites, FavoriteId);
    issue_id!(issue_setting_id, settings, SettingId);
}

/// Shared handle to the store.
#[derive(Debug, Clone)]
pub struct Store {
    inner: Arc<Mutex<Database>>,
}

impl Store {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self {
            inner: Arc::new(Mutex::new(db)),
        }
    }

    /// A store pre-populated with the demo dataset.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(Database::seeded())
    }

    /// Begins a transaction, blocking until exclusive access is granted.
    ///
    /// A poisoned lock is recovered rather than propagated: a panicking
    /// handler cannot leave a half-applied write behind because every
    /// multi-step mutation runs inside a single guard.
    pub fn begin(&self) -> Transaction<'_> {
        Transaction {
            guard: self
                .inner
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }
}

/// Exclusive access to the database for one unit of work.
///
/// Dereferences to [`Database`] so repositories can be constructed
/// straight from the transaction. Dropping the transaction releases
/// the store.
pub struct Transaction<'a> {
    guard: MutexGuard<'a, Database>,
}

impl Deref for Transaction<'_> {
    type Target = Database;

    fn deref(&self) -> &Database {
        &self.guard
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut Database {
        &mut self.guard
    }
}
