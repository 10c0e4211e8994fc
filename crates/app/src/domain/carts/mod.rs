//! Carts

pub mod errors;
pub mod models;
mod repositories;
pub mod service;
pub mod store;

pub use errors::{CartOperation, CartsServiceError, CartsStoreError};
pub use service::*;
pub use store::*;
