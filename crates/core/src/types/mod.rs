//! Shared type definitions.

pub mod email;
pub mod id;
pub mod order_number;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{
    CartItemId, CategoryId, FavoriteId, OrderId, OrderItemId, ProductId, SettingId, UserId,
};
pub use order_number::OrderNumber;
pub use status::{AccountStatus, OrderStatus, ParseStatusError};
