pub mod auth;
pub mod team;
pub mod user;
