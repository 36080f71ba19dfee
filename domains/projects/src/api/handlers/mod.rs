pub mod internal;
pub mod members;
pub mod projects;
