//! Repositories over the in-memory store.
//!
//! Each repository borrows the database mutably for the lifetime of
//! one transaction and exposes the operations of a single table. Reads
//! go through [`crate::store::query::Query`] and return owned rows;
//! mutations return the number of rows affected, with `0` standing in
//! for "no such row" rather than an error.

mod cart;
mod categories;
mod favorites;
mod orders;
mod products;
mod settings;
mod users;

pub use cart::{CartRepository, NewCartItem};
pub use categories::{CategoryRepository, NewCategory};
pub use favorites::{FavoriteRepository, NewFavorite};
pub use orders::{NewOrder, NewOrderItem, OrderListFilter, OrderRepository};
pub use products::{NewProduct, ProductListFilter, ProductRepository, ProductUpdate, TopProduct};
pub use settings::SettingRepository;
pub use users::{MemberListFilter, MemberSummary, NewUser, UserRepository};
