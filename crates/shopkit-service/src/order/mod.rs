//! Order placement and listing.

pub mod service;

pub use service::{OrderLineInput, OrderService, PlaceOrderInput};
