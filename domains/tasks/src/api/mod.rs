pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::{RawBearerToken, TasksState};
pub use routes::routes;
