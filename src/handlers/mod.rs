pub mod auth;
pub mod orders;
pub mod revenue;
pub mod settings;
pub mod stock;
pub mod stream;
