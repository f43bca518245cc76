pub mod access_control;
pub mod auth;
pub mod errors;
pub mod groups;
