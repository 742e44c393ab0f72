pub mod menu_items;
pub mod orders;
pub mod users;

pub use menu_items as menu_item_entity;
pub use menu_items::MenuCategory;
pub use orders as order_entity;
pub use orders::{DeliveryType, OrderLine, OrderLines, OrderStatus, PaymentMethod, PaymentStatus};
pub use users as user_entity;
pub use users::UserRole;
