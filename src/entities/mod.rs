pub mod admin;
pub mod order;
pub mod order_drink;
pub mod order_item;
pub mod queue_counter;
pub mod stock_item;
pub mod store_settings;
