//! Row types for the in-memory relational store.
//!
//! Each struct mirrors one table. Rows are plain data: identity comes
//! from the id column, timestamps are stamped by the repositories at
//! insert time, and nothing here touches the store directly.

mod cart_item;
mod category;
mod favorite;
mod order;
mod order_item;
mod product;
mod setting;
mod user;

pub use cart_item::CartItem;
pub use category::Category;
pub use favorite::Favorite;
pub use order::Order;
pub use order_item::OrderItem;
pub use product::Product;
pub use setting::Setting;
pub use user::User;
