//! GitHub Integration
//!
//! Payload types and the client contract used by the CLA reconcilers.

pub mod client;
pub mod types;

pub use client::{GitHubClient, GitHubError, RestClient, DEFAULT_API_URL};
pub use types::*;
