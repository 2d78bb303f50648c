//! Web front end for the upload server.
//!
//! Serves a single page at `/`: GET renders the upload form with the list of
//! stored files, POST accepts a multipart form and redirects back.

pub mod error;
pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod page;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
