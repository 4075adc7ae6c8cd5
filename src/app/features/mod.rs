pub mod auth;
pub mod hub;
