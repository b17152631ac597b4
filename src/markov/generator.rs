use super::model::{ContextPair, TrigramModel};
use super::sampler;
use super::GenerationError;
use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;

/// What to do when the trailing two words were never followed by anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FallbackPolicy {
    /// End the message early.
    Stop,
    /// With the given probability append a fresh random seed pair and keep
    /// going, otherwise stop.
    Restart { continuation_probability: f64 },
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        FallbackPolicy::Restart {
            continuation_probability: 0.5,
        }
    }
}

impl FallbackPolicy {
    fn continues<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        match *self {
            FallbackPolicy::Stop => false,
            FallbackPolicy::Restart {
                continuation_probability: p,
            } => p > 0.0 && rng.random::<f64>() < p,
        }
    }
}

/// Drives repeated sampling into a word sequence of at most `max_words`.
#[derive(Debug, Clone, Copy)]
pub struct SequenceGenerator {
    pub max_words: usize,
    pub temperature: f64,
    pub fallback: FallbackPolicy,
}

impl SequenceGenerator {
    pub fn new(max_words: usize, temperature: f64, fallback: FallbackPolicy) -> Self {
        SequenceGenerator {
            max_words,
            temperature,
            fallback,
        }
    }

    /// Generate text starting from a uniformly random context.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        model: &TrigramModel,
        rng: &mut R,
    ) -> Result<String, GenerationError> {
        Ok(self.generate_words(model, rng)?.join(" "))
    }

    pub fn generate_words<R: Rng + ?Sized>(
        &self,
        model: &TrigramModel,
        rng: &mut R,
    ) -> Result<Vec<String>, GenerationError> {
        let seeds: Vec<&ContextPair> = model.contexts().collect();
        let seed = (*seeds.choose(rng).ok_or(GenerationError::EmptyCorpus)?).clone();
        self.generate_from_seed(model, seed, rng)
    }

    /// Generate text that starts with the two words of `seed`.
    ///
    /// The seed does not have to be a known context; an unknown one goes
    /// straight to the fallback policy.
    pub fn generate_from_seed<R: Rng + ?Sized>(
        &self,
        model: &TrigramModel,
        seed: ContextPair,
        rng: &mut R,
    ) -> Result<Vec<String>, GenerationError> {
        if self.max_words < 2 {
            return Err(GenerationError::InvariantViolation(format!(
                "max_words must be at least 2, got {}",
                self.max_words
            )));
        }
        if model.is_empty() {
            return Err(GenerationError::EmptyCorpus);
        }

        let seeds: Vec<&ContextPair> = model.contexts().collect();
        let mut words = vec![seed.0.clone(), seed.1.clone()];
        let mut context = seed;

        while words.len() < self.max_words {
            match model.successors(&context) {
                Some(successors) => {
                    let next = sampler::sample(successors, self.temperature, rng)?.to_string();
                    context = (std::mem::take(&mut context.1), next.clone());
                    words.push(next);
                }
                None => {
                    if !self.fallback.continues(rng) {
                        debug!("Stopping at {} words: no successors for {:?}", words.len(), context);
                        break;
                    }

                    let fresh = (*seeds.choose(rng).ok_or(GenerationError::EmptyCorpus)?).clone();
                    words.push(fresh.0.clone());
                    if words.len() < self.max_words {
                        words.push(fresh.1.clone());
                    }
                    context = fresh;
                }
            }
        }

        Ok(words)
    }
}
