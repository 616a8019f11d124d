//! Plugin Registration
//!
//! The host webhook dispatcher owns routing. A plugin is a named bundle of
//! event handlers plus a help payload, built explicitly and handed to the
//! host at startup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::github::{GenericCommentEvent, StatusEvent};

/// Handles `status` webhooks
#[async_trait]
pub trait StatusEventHandler: Send + Sync {
    async fn handle_status(&self, event: &StatusEvent) -> Result<()>;
}

/// Handles comments on issues and PRs, whatever webhook they came from
#[async_trait]
pub trait GenericCommentHandler: Send + Sync {
    async fn handle_comment(&self, event: &GenericCommentEvent) -> Result<()>;
}

/// A chat command a plugin responds to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub usage: String,
    pub description: String,
    pub featured: bool,
    pub who_can_use: String,
    pub examples: Vec<String>,
}

/// User-facing documentation for a plugin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginHelp {
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,
}

impl PluginHelp {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            commands: Vec::new(),
        }
    }

    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }
}

pub struct Plugin {
    pub name: &'static str,
    pub help: PluginHelp,
    status_handler: Option<Arc<dyn StatusEventHandler>>,
    comment_handler: Option<Arc<dyn GenericCommentHandler>>,
}

impl Plugin {
    pub fn new(name: &'static str, help: PluginHelp) -> Self {
        Self {
            name,
            help,
            status_handler: None,
            comment_handler: None,
        }
    }

    pub fn with_status_handler(mut self, handler: Arc<dyn StatusEventHandler>) -> Self {
        self.status_handler = Some(handler);
        self
    }

    pub fn with_comment_handler(mut self, handler: Arc<dyn GenericCommentHandler>) -> Self {
        self.comment_handler = Some(handler);
        self
    }

    pub fn handles_status(&self) -> bool {
        self.status_handler.is_some()
    }

    pub fn handles_comments(&self) -> bool {
        self.comment_handler.is_some()
    }

    /// Deliver a status event. Returns `false` if no handler is registered.
    pub async fn dispatch_status(&self, event: &StatusEvent) -> Result<bool> {
        match &self.status_handler {
            Some(handler) => handler.handle_status(event).await.map(|()| true),
            None => Ok(false),
        }
    }

    /// Deliver a comment event. Returns `false` if no handler is registered.
    pub async fn dispatch_comment(&self, event: &GenericCommentEvent) -> Result<bool> {
        match &self.comment_handler {
            Some(handler) => handler.handle_comment(event).await.map(|()| true),
            None => Ok(false),
        }
    }
}
