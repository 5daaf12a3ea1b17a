//! HTTP surface for the contact book.

pub mod app_state;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod store;

pub use app_state::AppState;
pub use handlers::router;
pub use store::{ContactStore, StoreError};
