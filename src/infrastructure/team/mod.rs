//! Team infrastructure implementations

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresTeamRepository;
pub use repository::InMemoryTeamRepository;
pub use service::{
    AddMembershipRequest, CreateTeamRequest, RemoveMembershipRequest, TeamService,
    UpdateTeamRequest,
};
