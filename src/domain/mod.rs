//! Domain layer - Core business logic and entities

pub mod error;
pub mod pagination;
pub mod storage;
pub mod team;
pub mod user;
pub mod validation;

pub use error::{DomainError, ErrorKind};
pub use pagination::{Page, PageRequest};
pub use storage::StorageHealthCheck;
pub use team::{
    Membership, MembershipId, Team, TeamId, TeamMember, TeamRepository, TeamRole,
};
pub use user::{User, UserId, UserRepository, UserRole};
pub use validation::{FieldViolation, ValidationErrors};
