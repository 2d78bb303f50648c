//! Simple Upload Server
//!
//! A minimal web service that accepts file uploads through an HTML form and
//! lists the files uploaded so far.

pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use error::{Result, UploadError};
pub use file::{sanitize_filename, UploadStore};
pub use web::WebServer;
