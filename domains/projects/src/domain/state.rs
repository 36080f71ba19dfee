//! State machines for Projects domain entities
//!
//! Two independent machines: the project lifecycle (active/archived/deleted,
//! deleted is terminal) and member status (invited/active/removed, which is
//! *not* terminal — a removed member can be re-invited or rejoin by code).

pub use framecast_common::StateError;

// ============================================================================
// Project State Machine
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectState {
    Active,
    Archived,
    Deleted,
}

impl ProjectState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Deleted)
    }

    pub fn valid_transitions(&self) -> &'static [ProjectState] {
        match self {
            Self::Active => &[Self::Archived, Self::Deleted],
            Self::Archived => &[Self::Active, Self::Deleted],
            Self::Deleted => &[],
        }
    }
}

impl std::fmt::Display for ProjectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Archived => write!(f, "archived"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectEvent {
    Archive,
    Unarchive,
    Delete,
}

impl std::fmt::Display for ProjectEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Archive => write!(f, "archive"),
            Self::Unarchive => write!(f, "unarchive"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

pub struct ProjectStateMachine;

impl ProjectStateMachine {
    pub fn transition(
        current: ProjectState,
        event: ProjectEvent,
    ) -> Result<ProjectState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (&current, &event) {
            (ProjectState::Active, ProjectEvent::Archive) => ProjectState::Archived,
            (ProjectState::Active, ProjectEvent::Delete) => ProjectState::Deleted,
            (ProjectState::Archived, ProjectEvent::Unarchive) => ProjectState::Active,
            (ProjectState::Archived, ProjectEvent::Delete) => ProjectState::Deleted,

            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    to: "unknown".to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    pub fn can_transition(current: ProjectState, event: &ProjectEvent) -> bool {
        Self::transition(current, *event).is_ok()
    }
}

// ============================================================================
// Member State Machine
// ============================================================================

/// Member status transitions. Unlike `ProjectState`, no status is terminal:
/// a `removed` entry can be resurrected to `invited` or `active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberState {
    Invited,
    Active,
    Removed,
}

impl MemberState {
    pub fn valid_transitions(&self) -> &'static [MemberState] {
        match self {
            Self::Invited => &[Self::Active, Self::Removed],
            Self::Active => &[Self::Removed],
            Self::Removed => &[Self::Invited, Self::Active],
        }
    }
}

impl std::fmt::Display for MemberState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invited => write!(f, "invited"),
            Self::Active => write!(f, "active"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MemberEvent {
    Accept,
    Rescind,
    Leave,
    Reinvite,
    Rejoin,
}

impl std::fmt::Display for MemberEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accept => write!(f, "accept"),
            Self::Rescind => write!(f, "rescind"),
            Self::Leave => write!(f, "leave"),
            Self::Reinvite => write!(f, "reinvite"),
            Self::Rejoin => write!(f, "rejoin"),
        }
    }
}

pub struct MemberStateMachine;

impl MemberStateMachine {
    pub fn transition(current: MemberState, event: MemberEvent) -> Result<MemberState, StateError> {
        let next = match (&current, &event) {
            (MemberState::Invited, MemberEvent::Accept) => MemberState::Active,
            (MemberState::Invited, MemberEvent::Rescind) => MemberState::Removed,
            (MemberState::Active, MemberEvent::Leave) => MemberState::Removed,
            (MemberState::Removed, MemberEvent::Reinvite) => MemberState::Invited,
            (MemberState::Removed, MemberEvent::Rejoin) => MemberState::Active,

            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    to: "unknown".to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    pub fn can_transition(current: MemberState, event: &MemberEvent) -> bool {
        Self::transition(current, *event).is_ok()
    }
}
