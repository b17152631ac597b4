//! # Message Listeners
//!
//! Features that react to ordinary channel messages implement
//! [`MessageListener`] and are registered once at startup. The gateway
//! handler converts each Discord message into an [`IncomingMessage`] and
//! hands it to the [`ListenerRegistry`], which runs every listener in
//! registration order and collects their replies.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

use crate::chatter::{should_trigger, ChatterService};
use crate::markov::GenerationError;
use crate::throttle::GenerationThrottle;
use anyhow::Result;
use log::{debug, error, info};
use serenity::async_trait;
use std::sync::Arc;

/// A channel message stripped down to what listeners need.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Channel the message was posted in; scopes the corpus.
    pub scope_id: String,
    pub guild_id: Option<String>,
    pub message_id: String,
    pub author_is_bot: bool,
    pub mentions_bot: bool,
    pub content: String,
}

impl IncomingMessage {
    /// Settings are kept per guild, falling back to the channel in DMs.
    pub fn config_scope(&self) -> &str {
        self.guild_id.as_deref().unwrap_or(&self.scope_id)
    }
}

#[async_trait]
pub trait MessageListener: Send + Sync {
    fn name(&self) -> &'static str;

    /// Handle a message, optionally returning text to post in the channel.
    async fn on_message(&self, message: &IncomingMessage) -> Result<Option<String>>;
}

#[derive(Clone, Default)]
pub struct ListenerRegistry {
    listeners: Vec<Arc<dyn MessageListener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<L: MessageListener + 'static>(&mut self, listener: L) -> &mut Self {
        info!("Registered message listener: {}", listener.name());
        self.listeners.push(Arc::new(listener));
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Run every listener. A failing listener is logged and does not stop
    /// the ones after it.
    pub async fn dispatch(&self, message: &IncomingMessage) -> Vec<String> {
        let mut replies = Vec::new();
        for listener in &self.listeners {
            match listener.on_message(message).await {
                Ok(Some(reply)) => replies.push(reply),
                Ok(None) => {}
                Err(e) => error!(
                    "Listener '{}' failed on message {}: {}",
                    listener.name(),
                    message.message_id,
                    e
                ),
            }
        }
        replies
    }
}

/// Appends every human message to its channel's corpus.
pub struct CorpusRecorder {
    chatter: ChatterService,
}

impl CorpusRecorder {
    pub fn new(chatter: ChatterService) -> Self {
        CorpusRecorder { chatter }
    }
}

#[async_trait]
impl MessageListener for CorpusRecorder {
    fn name(&self) -> &'static str {
        "corpus_recorder"
    }

    async fn on_message(&self, message: &IncomingMessage) -> Result<Option<String>> {
        if message.author_is_bot || message.content.trim().is_empty() {
            return Ok(None);
        }

        self.chatter
            .observe(
                &message.scope_id,
                &message.message_id,
                &message.content,
                message.guild_id.as_deref(),
            )
            .await?;
        Ok(None)
    }
}

/// Replies with generated text when mentioned, or at random.
pub struct ChatterResponder {
    chatter: ChatterService,
    throttle: GenerationThrottle,
}

impl ChatterResponder {
    pub fn new(chatter: ChatterService, throttle: GenerationThrottle) -> Self {
        ChatterResponder { chatter, throttle }
    }
}

#[async_trait]
impl MessageListener for ChatterResponder {
    fn name(&self) -> &'static str {
        "chatter_responder"
    }

    async fn on_message(&self, message: &IncomingMessage) -> Result<Option<String>> {
        if message.author_is_bot {
            return Ok(None);
        }

        let config = self.chatter.config_for(message.config_scope()).await?;
        let triggered = should_trigger(&config, message.mentions_bot, &mut rand::rng());
        if !triggered {
            return Ok(None);
        }

        if !message.mentions_bot && !self.throttle.try_acquire(&message.scope_id) {
            debug!("Skipping unprompted reply in {}: cooling down", message.scope_id);
            return Ok(None);
        }

        match self.chatter.generate_with(&message.scope_id, &config).await {
            Ok(text) => {
                debug!("Generated reply for {}: {}", message.scope_id, text);
                Ok(Some(text))
            }
            Err(GenerationError::EmptyCorpus) => {
                debug!("Nothing to say in {} yet: empty corpus", message.scope_id);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
