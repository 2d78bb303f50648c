//! Middleware for the upload page.

pub mod security;

pub use security::security_headers;
