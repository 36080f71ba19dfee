//! Task state machine
//!
//! Five states; `archived` is terminal, mirroring the terminal-check-first
//! shape used for job status transitions elsewhere in this codebase.

pub use framecast_common::StateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    Backlog,
    InProgress,
    Blocked,
    Done,
    Archived,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Archived)
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backlog => write!(f, "backlog"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Blocked => write!(f, "blocked"),
            Self::Done => write!(f, "done"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskEvent {
    Start,
    Block,
    Unblock,
    Complete,
    Reopen,
    Archive,
}

impl std::fmt::Display for TaskEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Block => write!(f, "block"),
            Self::Unblock => write!(f, "unblock"),
            Self::Complete => write!(f, "complete"),
            Self::Reopen => write!(f, "reopen"),
            Self::Archive => write!(f, "archive"),
        }
    }
}

impl TaskEvent {
    /// The status this event moves a task to, independent of whether
    /// it's actually legal from the current state. Used to name the
    /// rejected target in `StateError::InvalidTransition`.
    fn target_state(&self) -> TaskState {
        match self {
            Self::Start => TaskState::InProgress,
            Self::Block => TaskState::Blocked,
            Self::Unblock => TaskState::InProgress,
            Self::Complete => TaskState::Done,
            Self::Reopen => TaskState::InProgress,
            Self::Archive => TaskState::Archived,
        }
    }
}

pub struct TaskStateMachine;

impl TaskStateMachine {
    pub fn transition(current: TaskState, event: TaskEvent) -> Result<TaskState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (&current, &event) {
            (TaskState::Backlog, TaskEvent::Start) => TaskState::InProgress,
            (TaskState::Backlog, TaskEvent::Archive) => TaskState::Archived,

            (TaskState::InProgress, TaskEvent::Block) => TaskState::Blocked,
            (TaskState::InProgress, TaskEvent::Complete) => TaskState::Done,
            (TaskState::InProgress, TaskEvent::Archive) => TaskState::Archived,

            (TaskState::Blocked, TaskEvent::Unblock) => TaskState::InProgress,
            (TaskState::Blocked, TaskEvent::Archive) => TaskState::Archived,

            (TaskState::Done, TaskEvent::Reopen) => TaskState::InProgress,
            (TaskState::Done, TaskEvent::Archive) => TaskState::Archived,

            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    to: event.target_state().to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    pub fn can_transition(current: TaskState, event: &TaskEvent) -> bool {
        Self::transition(current, *event).is_ok()
    }
}
