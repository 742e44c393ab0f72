pub mod email;
pub mod google;
pub mod payment;

pub use email::*;
pub use google::*;
pub use payment::*;
