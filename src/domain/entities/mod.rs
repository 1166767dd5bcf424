//! Core domain entities.
//!
//! Users and sessions are owned by the identity backend; profiles and tasks
//! are plain rows keyed by the user's id. Entities carry no I/O.
//!
//! - [`User`], [`Session`] - identity records
//! - [`Profile`] - per-user profile
//! - [`Task`] - a task on the user's list
//!
//! Creation uses separate `New*` structs; partial updates use [`TaskUpdate`]
//! and [`UserUpdate`].

pub mod profile;
pub mod task;
pub mod user;

pub use profile::{NewProfile, Profile};
pub use task::{NewTask, ParseTaskFieldError, Task, TaskPriority, TaskStatus, TaskUpdate};
pub use user::{IdentityError, Session, SignUpOutcome, User, UserUpdate};
