//! Request handlers for the upload page.

pub mod state;
pub mod upload;

pub use state::AppState;
pub use upload::{index, upload, FILE_FIELD, NO_FILE_SELECTED};
