pub mod ai_service;
pub mod availability_service;
pub mod booking_flow;
pub mod cart_service;
pub mod pricing_service;
