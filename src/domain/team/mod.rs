//! Team domain module
//!
//! Teams group users through memberships. A team is always created together
//! with a project manager membership for its creator.

mod entity;
mod membership;
mod repository;
mod validation;

pub use entity::{Team, TeamId};
pub use membership::{Membership, MembershipId, TeamMember, TeamRole};
pub use repository::TeamRepository;
pub use validation::{validate_team_name, TeamValidationError};

#[cfg(test)]
pub use repository::MockTeamRepository;
