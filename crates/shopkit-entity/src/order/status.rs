//! Fulfilment state of an order.

use crate::status::status_enum;

status_enum! {
    /// Orders start out `pending`; later transitions belong to fulfilment.
    OrderStatus as "order_status" {
        Pending => "pending",
        Paid => "paid",
        Shipped => "shipped",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}
