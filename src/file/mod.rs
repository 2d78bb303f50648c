//! Upload store for the upload server.
//!
//! Uploaded files live in a single flat directory and are keyed by the
//! final path segment of the name the client sent.

mod filename;
mod storage;

pub use filename::sanitize_filename;
pub use storage::UploadStore;
