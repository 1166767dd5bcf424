//! Identity backend adapters.

mod gotrue_client;

pub use gotrue_client::{GoTrueClient, GoTrueConfig, TRACING_TARGET};
