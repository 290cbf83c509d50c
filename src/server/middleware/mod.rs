pub mod auth;
pub mod cookie;
