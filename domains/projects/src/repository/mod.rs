pub mod projects;
pub mod transactions;

use sqlx::{PgPool, Postgres, Transaction};

pub use projects::{ProjectListFilter, ProjectRepository, ProjectSort};

#[derive(Clone)]
pub struct ProjectsRepositories {
    pool: PgPool,
    pub projects: ProjectRepository,
}

impl ProjectsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            projects: ProjectRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Raw pool accessor, for cross-domain or ad-hoc queries that don't fit
    /// the repository's own methods.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
