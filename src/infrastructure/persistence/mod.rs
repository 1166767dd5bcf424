//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgProfileRepository`] - Profile rows
//! - [`PgTaskRepository`] - Per-user tasks

pub mod pg_profile_repository;
pub mod pg_task_repository;

pub use pg_profile_repository::PgProfileRepository;
pub use pg_task_repository::PgTaskRepository;
