pub mod error;
pub mod json;
pub mod pagination;
pub mod query;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use pagination::Pagination;
pub use query::Query;
