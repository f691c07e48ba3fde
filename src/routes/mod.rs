pub mod authentication;
pub mod health_check;
pub mod products;
pub mod restocks;
pub mod suppliers;
pub mod users;

pub use health_check::*;
