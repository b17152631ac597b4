//! # Feature: Channel Chatter
//!
//! Records channel messages and turns them back into new text. The trigram
//! model is rebuilt from a fresh snapshot of the corpus on every call and
//! dropped afterwards, so concurrent requests never share one.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.0.0: Corpus recording, per-guild settings, on-demand and random replies

use crate::config::GenerationConfig;
use crate::database::Database;
use crate::markov::{FallbackPolicy, GenerationError, SequenceGenerator, Tokenizer, TrigramModel};
use anyhow::Result;
use log::debug;
use rand::Rng;

/// Size of a channel's corpus as the generator sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusStats {
    pub messages: i64,
    pub contexts: usize,
}

#[derive(Clone)]
pub struct ChatterService {
    database: Database,
    whitespace: Tokenizer,
    strict: Tokenizer,
}

impl ChatterService {
    pub fn new(database: Database) -> Result<Self> {
        Ok(ChatterService {
            database,
            whitespace: Tokenizer::whitespace(),
            strict: Tokenizer::strict()?,
        })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Record a message in its channel's corpus. Repeats are ignored.
    pub async fn observe(
        &self,
        scope_id: &str,
        message_id: &str,
        text: &str,
        guild_id: Option<&str>,
    ) -> Result<bool> {
        self.database.append_message(scope_id, message_id, text, guild_id).await
    }

    /// Generate text for a channel with whitespace tokens and the default
    /// fallback policy.
    pub async fn generate(
        &self,
        scope_id: &str,
        max_words: usize,
        temperature: f64,
    ) -> Result<String, GenerationError> {
        let texts = self.database.list_messages(scope_id).await?;
        let generator = SequenceGenerator::new(max_words, temperature, FallbackPolicy::default());
        run_generator(&texts, &self.whitespace, &generator)
    }

    /// Generate text for a channel using a guild's settings.
    pub async fn generate_with(
        &self,
        scope_id: &str,
        config: &GenerationConfig,
    ) -> Result<String, GenerationError> {
        let texts = self.database.list_messages(scope_id).await?;
        let generator = SequenceGenerator::new(
            config.max_words,
            config.temperature,
            config.fallback_policy(),
        );
        run_generator(&texts, self.tokenizer_for(config), &generator)
    }

    pub async fn config_for(&self, config_scope: &str) -> Result<GenerationConfig> {
        self.database.get_or_create_generation_config(config_scope).await
    }

    pub async fn save_config(&self, config_scope: &str, config: &GenerationConfig) -> Result<()> {
        self.database.set_generation_config(config_scope, config).await
    }

    pub async fn corpus_stats(&self, scope_id: &str, config: &GenerationConfig) -> Result<CorpusStats> {
        let messages = self.database.corpus_size(scope_id).await?;
        let texts = self.database.list_messages(scope_id).await?;
        let model = TrigramModel::build(&texts, self.tokenizer_for(config));
        Ok(CorpusStats {
            messages,
            contexts: model.context_count(),
        })
    }

    pub async fn latest_message_id(&self, scope_id: &str) -> Result<Option<String>> {
        self.database.latest_message_id(scope_id).await
    }

    pub async fn purge(&self, scope_id: &str) -> Result<usize> {
        self.database.purge_corpus(scope_id).await
    }

    fn tokenizer_for(&self, config: &GenerationConfig) -> &Tokenizer {
        if config.strict_tokens {
            &self.strict
        } else {
            &self.whitespace
        }
    }
}

/// Decide whether a message should get a generated reply.
pub fn should_trigger<R: Rng + ?Sized>(config: &GenerationConfig, mentioned: bool, rng: &mut R) -> bool {
    if !config.enabled {
        return false;
    }
    mentioned || rng.random::<f64>() < config.trigger_probability
}

fn run_generator(
    texts: &[String],
    tokenizer: &Tokenizer,
    generator: &SequenceGenerator,
) -> Result<String, GenerationError> {
    let model = TrigramModel::build(texts, tokenizer);
    debug!(
        "Built trigram model with {} context(s) from {} message(s)",
        model.context_count(),
        texts.len()
    );

    let mut rng = rand::rng();
    generator.generate(&model, &mut rng)
}
