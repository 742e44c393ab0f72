pub mod admin;
pub mod auth;
pub mod health;
pub mod menu;
pub mod order;

pub use admin::admin_config;
pub use auth::auth_config;
pub use health::health;
pub use menu::menu_config;
pub use order::order_config;
