//! Project and Member domain entities

use chrono::{DateTime, Utc};
use framecast_common::Error;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use super::state::{MemberState, ProjectEvent, ProjectState, ProjectStateMachine};

pub const INVITATION_CODE_LEN: usize = 8;
const INVITATION_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub fn generate_invitation_code() -> String {
    let mut rng = rand::thread_rng();
    (0..INVITATION_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..INVITATION_CODE_ALPHABET.len());
            INVITATION_CODE_ALPHABET[idx] as char
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Member,
    Viewer,
}

impl MemberRole {
    /// Higher number outranks lower; used by `Project::member_has_at_least`.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Admin => 3,
            Self::Member => 2,
            Self::Viewer => 1,
        }
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Member => write!(f, "member"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for MemberRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            "viewer" => Ok(Self::Viewer),
            other => Err(Error::Validation(format!("unknown role: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Invited,
    Removed,
}

impl From<MemberStatus> for MemberState {
    fn from(value: MemberStatus) -> Self {
        match value {
            MemberStatus::Active => MemberState::Active,
            MemberStatus::Invited => MemberState::Invited,
            MemberStatus::Removed => MemberState::Removed,
        }
    }
}

impl From<MemberState> for MemberStatus {
    fn from(value: MemberState) -> Self {
        match value {
            MemberState::Active => MemberStatus::Active,
            MemberState::Invited => MemberStatus::Invited,
            MemberState::Removed => MemberStatus::Removed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub joined_at: DateTime<Utc>,
    pub invited_by: Option<Uuid>,
    pub invitation_sent_at: Option<DateTime<Utc>>,
    pub last_active: Option<DateTime<Utc>>,
}

impl Member {
    pub fn new_owner(user_id: Uuid, email: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            email,
            role: MemberRole::Admin,
            status: MemberStatus::Active,
            joined_at: now,
            invited_by: None,
            invitation_sent_at: None,
            last_active: Some(now),
        }
    }

    pub fn new_invited(user_id: Uuid, email: Option<String>, role: MemberRole, invited_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            email,
            role,
            status: MemberStatus::Invited,
            joined_at: now,
            invited_by: Some(invited_by),
            invitation_sent_at: Some(now),
            last_active: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Archived,
    Deleted,
}

impl From<ProjectStatus> for ProjectState {
    fn from(value: ProjectStatus) -> Self {
        match value {
            ProjectStatus::Active => ProjectState::Active,
            ProjectStatus::Archived => ProjectState::Archived,
            ProjectStatus::Deleted => ProjectState::Deleted,
        }
    }
}

impl From<ProjectState> for ProjectStatus {
    fn from(value: ProjectState) -> Self {
        match value {
            ProjectState::Active => ProjectStatus::Active,
            ProjectState::Archived => ProjectStatus::Archived,
            ProjectState::Deleted => ProjectStatus::Deleted,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub allow_member_invite: bool,
    pub max_members: Option<i32>,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            is_public: false,
            allow_member_invite: false,
            max_members: None,
        }
    }
}

impl ProjectSettings {
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(max) = self.max_members {
            if max < 1 {
                return Err(Error::Validation(
                    "settings.maxMembers must be at least 1".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// `totalTasks`/`completedTasks` are maintained on the Project service's own
/// row; nothing currently pushes updates into them from the Task service
/// (the two own separate databases and there's no event subscriber on this
/// side of the notifier). They default to zero and `progress` derives from
/// whatever values are stored. See DESIGN.md for the tracked gap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub total_tasks: i32,
    pub completed_tasks: i32,
    pub progress: i32,
}

impl ProjectMetadata {
    pub fn new(total_tasks: i32, completed_tasks: i32) -> Self {
        let progress = if total_tasks > 0 {
            ((completed_tasks as f64 / total_tasks as f64) * 100.0).round() as i32
        } else {
            0
        };
        Self {
            total_tasks,
            completed_tasks,
            progress,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub status: ProjectStatus,
    pub invitation_code: String,
    pub settings: Json<ProjectSettings>,
    pub total_tasks: i32,
    pub completed_tasks: i32,
    pub members: Json<Vec<Member>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(
        created_by: Uuid,
        creator_email: Option<String>,
        name: String,
        description: Option<String>,
        settings: ProjectSettings,
        invitation_code: String,
    ) -> Result<Self, Error> {
        let name = name.trim().to_string();
        if name.len() < 3 || name.len() > 100 {
            return Err(Error::Validation(
                "name must be between 3 and 100 characters".to_string(),
            ));
        }
        if let Some(ref desc) = description {
            if desc.len() > 500 {
                return Err(Error::Validation(
                    "description must be at most 500 characters".to_string(),
                ));
            }
        }
        settings.validate()?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description,
            created_by,
            status: ProjectStatus::Active,
            invitation_code,
            settings: Json(settings),
            total_tasks: 0,
            completed_tasks: 0,
            members: Json(vec![Member::new_owner(created_by, creator_email)]),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn metadata(&self) -> ProjectMetadata {
        ProjectMetadata::new(self.total_tasks, self.completed_tasks)
    }

    pub fn apply_transition(&mut self, event: ProjectEvent) -> Result<(), Error> {
        let next = ProjectStateMachine::transition(self.status.into(), event)?;
        self.status = next.into();
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn find_member(&self, user_id: Uuid) -> Option<&Member> {
        self.members.0.iter().find(|m| m.user_id == user_id)
    }

    pub fn find_member_mut(&mut self, user_id: Uuid) -> Option<&mut Member> {
        self.members.0.iter_mut().find(|m| m.user_id == user_id)
    }

    pub fn is_active_member(&self, user_id: Uuid) -> bool {
        self.find_member(user_id).is_some_and(Member::is_active)
    }

    pub fn role_of(&self, user_id: Uuid) -> Option<MemberRole> {
        self.find_member(user_id)
            .filter(|m| m.is_active())
            .map(|m| m.role)
    }

    pub fn member_has_at_least(&self, user_id: Uuid, role: MemberRole) -> bool {
        self.role_of(user_id)
            .is_some_and(|actual| actual.rank() >= role.rank())
    }

    pub fn active_member_count(&self) -> usize {
        self.members.0.iter().filter(|m| m.is_active()).count()
    }

    pub fn at_member_capacity(&self) -> bool {
        match self.settings.0.max_members {
            Some(max) => self.active_member_count() as i32 >= max,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ProjectSettings {
        ProjectSettings::default()
    }

    #[test]
    fn test_new_project_adds_creator_as_admin() {
        let owner = Uuid::new_v4();
        let project = Project::new(
            owner,
            Some("owner@example.com".to_string()),
            "My Project".to_string(),
            None,
            settings(),
            generate_invitation_code(),
        )
        .unwrap();

        assert_eq!(project.members.0.len(), 1);
        assert_eq!(project.role_of(owner), Some(MemberRole::Admin));
        assert!(project.is_active_member(owner));
    }

    #[test]
    fn test_name_too_short_rejected() {
        let result = Project::new(
            Uuid::new_v4(),
            None,
            "ab".to_string(),
            None,
            settings(),
            generate_invitation_code(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_description_too_long_rejected() {
        let result = Project::new(
            Uuid::new_v4(),
            None,
            "Valid Name".to_string(),
            Some("x".repeat(501)),
            settings(),
            generate_invitation_code(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invitation_code_has_expected_length() {
        let code = generate_invitation_code();
        assert_eq!(code.len(), INVITATION_CODE_LEN);
    }

    #[test]
    fn test_member_has_at_least_hierarchy() {
        let owner = Uuid::new_v4();
        let mut project = Project::new(
            owner,
            None,
            "Valid Name".to_string(),
            None,
            settings(),
            generate_invitation_code(),
        )
        .unwrap();

        let viewer_id = Uuid::new_v4();
        project
            .members
            .0
            .push(Member::new_invited(viewer_id, None, MemberRole::Viewer, owner));
        project.find_member_mut(viewer_id).unwrap().status = MemberStatus::Active;

        assert!(project.member_has_at_least(owner, MemberRole::Admin));
        assert!(project.member_has_at_least(viewer_id, MemberRole::Viewer));
        assert!(!project.member_has_at_least(viewer_id, MemberRole::Member));
    }

    #[test]
    fn test_at_member_capacity() {
        let owner = Uuid::new_v4();
        let mut s = settings();
        s.max_members = Some(1);
        let project = Project::new(owner, None, "Valid Name".to_string(), None, s, generate_invitation_code())
            .unwrap();

        assert!(project.at_member_capacity());
    }

    #[test]
    fn test_metadata_progress_computation() {
        let mut project = Project::new(
            Uuid::new_v4(),
            None,
            "Valid Name".to_string(),
            None,
            settings(),
            generate_invitation_code(),
        )
        .unwrap();
        project.total_tasks = 4;
        project.completed_tasks = 1;

        assert_eq!(project.metadata().progress, 25);
    }

    #[test]
    fn test_apply_transition_updates_status() {
        let mut project = Project::new(
            Uuid::new_v4(),
            None,
            "Valid Name".to_string(),
            None,
            settings(),
            generate_invitation_code(),
        )
        .unwrap();

        project.apply_transition(ProjectEvent::Archive).unwrap();
        assert_eq!(project.status, ProjectStatus::Archived);

        project.apply_transition(ProjectEvent::Delete).unwrap();
        assert_eq!(project.status, ProjectStatus::Deleted);

        assert!(project.apply_transition(ProjectEvent::Unarchive).is_err());
    }
}
