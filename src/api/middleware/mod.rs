//! HTTP middleware

mod logging;

pub use logging::{access_log_middleware, REQUEST_ID_HEADER};
