pub mod auth;
pub mod deploy_listener;
