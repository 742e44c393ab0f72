pub mod admin;
pub mod common;
pub mod menu;
pub mod order;
pub mod pagination;
pub mod user;

pub use admin::*;
pub use common::*;
pub use menu::*;
pub use order::*;
pub use pagination::*;
pub use user::*;
