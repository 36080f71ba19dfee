use framecast_common::RepositoryError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{generate_invitation_code, MemberRole, Project, ProjectStatus};

use super::transactions::{insert_project_tx, invitation_code_exists_tx};

const MAX_INVITATION_CODE_ATTEMPTS: u32 = 10;

/// Filters for `listUserProjects`. `status` defaults to "not deleted"
/// when absent, matching how the domain operation is specified.
#[derive(Debug, Clone, Default)]
pub struct ProjectListFilter {
    pub status: Option<ProjectStatus>,
    pub role: Option<MemberRole>,
    pub search: Option<String>,
}

/// Sort key for `listUserProjects`, defaulting to `-updatedAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectSort {
    UpdatedAtDesc,
    UpdatedAtAsc,
    CreatedAtDesc,
    CreatedAtAsc,
    NameDesc,
    NameAsc,
}

impl Default for ProjectSort {
    fn default() -> Self {
        Self::UpdatedAtDesc
    }
}

impl ProjectSort {
    /// Parses the `sort` query parameter's `±field` syntax
    /// (e.g. `-updatedAt`, `+name`). Unknown values fall back to the
    /// default rather than erroring, since `sort` is advisory.
    pub fn parse(raw: &str) -> Self {
        let (descending, field) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.strip_prefix('+').unwrap_or(raw)),
        };
        match (field, descending) {
            ("updatedAt", false) => Self::UpdatedAtAsc,
            ("updatedAt", true) => Self::UpdatedAtDesc,
            ("createdAt", false) => Self::CreatedAtAsc,
            ("createdAt", true) => Self::CreatedAtDesc,
            ("name", false) => Self::NameAsc,
            ("name", true) => Self::NameDesc,
            _ => Self::default(),
        }
    }

    fn sql(self) -> &'static str {
        match self {
            Self::UpdatedAtDesc => "updated_at DESC",
            Self::UpdatedAtAsc => "updated_at ASC",
            Self::CreatedAtDesc => "created_at DESC",
            Self::CreatedAtAsc => "created_at ASC",
            Self::NameDesc => "name DESC",
            Self::NameAsc => "name ASC",
        }
    }
}

fn member_role_str(role: MemberRole) -> &'static str {
    match role {
        MemberRole::Admin => "admin",
        MemberRole::Member => "member",
        MemberRole::Viewer => "viewer",
    }
}

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts `project` with a collision-checked invitation code, retrying
    /// with a freshly generated code up to a bounded number of attempts.
    /// `project.invitation_code` is overwritten on each retry.
    pub async fn create(&self, mut project: Project) -> Result<Project, RepositoryError> {
        let mut attempts = 0;
        loop {
            let mut tx = self.pool.begin().await.map_err(RepositoryError::Connection)?;

            if invitation_code_exists_tx(&mut tx, &project.invitation_code).await? {
                attempts += 1;
                if attempts >= MAX_INVITATION_CODE_ATTEMPTS {
                    return Err(RepositoryError::InvalidData(
                        "could not generate a unique invitation code".to_string(),
                    ));
                }
                project.invitation_code = generate_invitation_code();
                continue;
            }

            insert_project_tx(&mut tx, &project).await?;
            tx.commit().await.map_err(RepositoryError::Connection)?;
            return Ok(project);
        }
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Project>, RepositoryError> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, created_by, status, invitation_code,
                   settings, total_tasks, completed_tasks, members, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::Connection)
    }

    pub async fn find_by_invitation_code(
        &self,
        code: &str,
    ) -> Result<Option<Project>, RepositoryError> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, created_by, status, invitation_code,
                   settings, total_tasks, completed_tasks, members, created_at, updated_at
            FROM projects
            WHERE invitation_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::Connection)
    }

    /// Lists projects where `user_id` has any (non-removed) membership row.
    /// `filter.status` absent means "not deleted"; `filter.role` restricts
    /// to projects where the caller holds that exact role.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: &ProjectListFilter,
        sort: ProjectSort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>, RepositoryError> {
        let query = format!(
            r#"
            SELECT id, name, description, created_by, status, invitation_code,
                   settings, total_tasks, completed_tasks, members, created_at, updated_at
            FROM projects
            WHERE ($2::project_status IS NULL AND status != 'deleted' OR status = $2)
              AND members @> jsonb_build_array(jsonb_build_object('userId', $1))
              AND ($3::text IS NULL OR members @> jsonb_build_array(jsonb_build_object('userId', $1, 'role', $3)))
              AND ($4::text IS NULL OR name ILIKE '%' || $4 || '%')
            ORDER BY {}
            LIMIT $5 OFFSET $6
            "#,
            sort.sql()
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id.to_string())
            .bind(filter.status)
            .bind(filter.role.map(member_role_str))
            .bind(filter.search.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(RepositoryError::Connection)
    }

    /// Total count backing `list_for_user`'s pagination metadata.
    pub async fn count_for_user(
        &self,
        user_id: Uuid,
        filter: &ProjectListFilter,
    ) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT count(*)
            FROM projects
            WHERE ($2::project_status IS NULL AND status != 'deleted' OR status = $2)
              AND members @> jsonb_build_array(jsonb_build_object('userId', $1))
              AND ($3::text IS NULL OR members @> jsonb_build_array(jsonb_build_object('userId', $1, 'role', $3)))
              AND ($4::text IS NULL OR name ILIKE '%' || $4 || '%')
            "#,
        )
        .bind(user_id.to_string())
        .bind(filter.status)
        .bind(filter.role.map(member_role_str))
        .bind(filter.search.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::Connection)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE projects
            SET status = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(ProjectStatus::Deleted)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::Connection)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
