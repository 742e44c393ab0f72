pub mod admin_service;
pub mod auth_service;
pub mod menu_service;
pub mod order_service;

pub use admin_service::*;
pub use auth_service::*;
pub use menu_service::*;
pub use order_service::*;
