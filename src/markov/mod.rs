//! # Feature: Trigram Generation
//!
//! Builds a trigram Markov model from a channel's recorded messages and
//! samples new text from it with temperature scaling.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.0.0: Temperature-scaled sampling, configurable fallback on unseen contexts

pub mod generator;
pub mod model;
pub mod sampler;
pub mod tokenizer;

use thiserror::Error;

pub use generator::{FallbackPolicy, SequenceGenerator};
pub use model::{ContextPair, Successors, TrigramModel};
pub use tokenizer::Tokenizer;

/// Failures a caller of the generator has to branch on.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No trigram context exists for the scope. Callers usually stay silent.
    #[error("no trigram contexts recorded for this channel yet")]
    EmptyCorpus,

    /// A broken internal invariant (e.g. sampling an empty successor set).
    #[error("generator invariant violated: {0}")]
    InvariantViolation(String),

    /// Reading the corpus failed.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
