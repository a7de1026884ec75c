pub mod auth;
pub mod error;
pub mod policy;
pub mod profile;
