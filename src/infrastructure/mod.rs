//! Infrastructure layer - Store adapters, services and process plumbing

pub mod logging;
pub mod storage;
pub mod team;
pub mod user;
