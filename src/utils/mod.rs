pub mod hours;
pub mod jwt;
pub mod order_number;
pub mod password;
pub mod pricing;
pub mod reset_token;
pub mod validation;

pub use hours::*;
pub use jwt::*;
pub use order_number::OrderNumberGenerator;
pub use password::*;
pub use pricing::*;
pub use reset_token::*;
pub use validation::*;
