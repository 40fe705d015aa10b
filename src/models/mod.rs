pub mod cart;
pub mod catalog;
pub mod child;
pub mod instructor;
pub mod pricing;
pub mod time_format;
