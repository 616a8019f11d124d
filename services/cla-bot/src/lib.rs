//! CLA Label Bot Library
//!
//! Keeps the `cncf-cla: yes` / `cncf-cla: no` labels on pull requests in
//! step with the `EasyCLA` commit status.
//!
//! ## Modules
//!
//! - [`cla`]: the reconcilers and the pure label transition logic
//! - [`github`]: payload types, the client trait and its REST implementation
//! - [`plugin`]: handler traits and the help payload the host registers
//! - [`retry`]: bounded retry used for the PR search
//! - [`auth`]: GitHub App JWT and installation token exchange
//! - [`config`]: CLI/env configuration for the `cla-bot` binary
//!
//! ## Example Pipeline
//!
//! ```bash
//! # Deliver a status webhook payload
//! GITHUB_TOKEN=$TOKEN cla-bot status --event status.json
//!
//! # Deliver a /check-cla comment
//! cla-bot \
//!   --app-id $GITHUB_APP_ID \
//!   --private-key-path /path/to/key.pem \
//!   --installation-id $INSTALLATION_ID \
//!   comment --event comment.json
//! ```

pub mod auth;
pub mod cla;
pub mod config;
pub mod error;
pub mod github;
pub mod plugin;
pub mod retry;

#[cfg(test)]
pub(crate) mod testing;

pub use error::ClaError;
