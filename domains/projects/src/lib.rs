//! Projects domain: projects, members, invitations

pub mod api;
pub mod domain;
pub mod repository;

pub use api::{routes, ProjectsState};
pub use domain::entities::{
    Member, MemberRole, MemberStatus, Project, ProjectMetadata, ProjectSettings, ProjectStatus,
};
pub use domain::state::{
    MemberEvent, MemberState, MemberStateMachine, ProjectEvent, ProjectState, ProjectStateMachine,
    StateError,
};
pub use repository::ProjectsRepositories;
