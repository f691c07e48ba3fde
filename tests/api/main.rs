
mod products;
mod users;
