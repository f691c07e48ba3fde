pub mod user_email;
pub mod user_role;
