//! User domain
//!
//! User accounts, their field validation and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId, UserRole};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_password, validate_user_name, UserValidationError,
};

#[cfg(test)]
pub use repository::MockUserRepository;
