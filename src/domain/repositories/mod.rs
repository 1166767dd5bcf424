//! Repository and backend trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure`. Mock implementations are generated via `mockall`
//! for unit tests.
//!
//! # Available Ports
//!
//! - [`IdentityBackend`] - sign-in, sign-up, credential updates, account deletion
//! - [`ProfileRepository`] - profile rows
//! - [`TaskRepository`] - per-user tasks
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod identity_backend;
pub mod profile_repository;
pub mod task_repository;

pub use identity_backend::IdentityBackend;
pub use profile_repository::ProfileRepository;
pub use task_repository::TaskRepository;

#[cfg(test)]
pub use identity_backend::MockIdentityBackend;
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
#[cfg(test)]
pub use task_repository::MockTaskRepository;
