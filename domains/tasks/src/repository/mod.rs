pub mod activity;
pub mod tasks;
pub mod transactions;

use sqlx::{PgPool, Postgres, Transaction};

pub use activity::TaskActivityRepository;
pub use tasks::{TaskListFilter, TaskRepository, TaskSort};

#[derive(Clone)]
pub struct TasksRepositories {
    pool: PgPool,
    pub tasks: TaskRepository,
    pub activity: TaskActivityRepository,
}

impl TasksRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tasks: TaskRepository::new(pool.clone()),
            activity: TaskActivityRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
