mod products;
mod restocks;
mod suppliers;
mod users;

pub use products::*;
pub use restocks::*;
pub use suppliers::*;
pub use users::*;
