//! API response models.

pub mod common;
pub mod error;

pub use common::{ApiError, ApiResponse, ResponseMeta};
pub use error::ErrorResponse;
