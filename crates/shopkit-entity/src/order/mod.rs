//! Order entities.

pub mod model;
pub mod status;

pub use model::{
    NewOrder, NewOrderLine, ORDER_SORT_FIELDS, Order, OrderFilter, OrderItem, OrderWithItems,
};
pub use status::OrderStatus;
