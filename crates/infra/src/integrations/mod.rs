//! External service integrations

pub mod outlook;
