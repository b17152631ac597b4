use super::tokenizer::Tokenizer;
use std::collections::BTreeMap;

/// Two consecutive words used as the lookup key for the next word.
pub type ContextPair = (String, String);

/// Next word -> number of times it followed a context.
pub type Successors = BTreeMap<String, u32>;

/// Trigram counts aggregated over a whole channel corpus.
///
/// Ordered maps keep two builds of the same corpus identical regardless of
/// the order messages were read in, which also makes seeded sampling
/// reproducible in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrigramModel {
    transitions: BTreeMap<ContextPair, Successors>,
}

impl TrigramModel {
    /// Count every `(w1, w2) -> w3` window in every message.
    ///
    /// Messages with fewer than three tokens contribute nothing.
    pub fn build<I, S>(texts: I, tokenizer: &Tokenizer) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut transitions: BTreeMap<ContextPair, Successors> = BTreeMap::new();

        for text in texts {
            let tokens = tokenizer.tokenize(text.as_ref());
            for window in tokens.windows(3) {
                *transitions
                    .entry((window[0].clone(), window[1].clone()))
                    .or_default()
                    .entry(window[2].clone())
                    .or_insert(0) += 1;
            }
        }

        TrigramModel { transitions }
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn context_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn successors(&self, context: &ContextPair) -> Option<&Successors> {
        self.transitions.get(context)
    }

    pub fn contexts(&self) -> impl Iterator<Item = &ContextPair> {
        self.transitions.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: &str, b: &str) -> ContextPair {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn test_build_shared_context() {
        let model = TrigramModel::build(["the cat sat", "the cat ran"], &Tokenizer::whitespace());

        assert_eq!(model.context_count(), 1);
        let successors = model.successors(&pair("the", "cat")).unwrap();
        assert_eq!(successors.get("sat"), Some(&1));
        assert_eq!(successors.get("ran"), Some(&1));
        assert_eq!(successors.len(), 2);
    }

    #[test]
    fn test_build_counts_repeats_and_lowercases() {
        let model = TrigramModel::build(
            ["The cat sat", "the CAT sat", "the cat sat down"],
            &Tokenizer::whitespace(),
        );

        assert_eq!(model.successors(&pair("the", "cat")).unwrap().get("sat"), Some(&3));
        assert_eq!(model.successors(&pair("cat", "sat")).unwrap().get("down"), Some(&1));
        assert_eq!(model.context_count(), 2);
    }

    #[test]
    fn test_short_messages_contribute_nothing() {
        let model = TrigramModel::build(["hi", "hello there", ""], &Tokenizer::whitespace());
        assert!(model.is_empty());
    }

    #[test]
    fn test_empty_corpus_builds_empty_model() {
        let model = TrigramModel::build(Vec::<String>::new(), &Tokenizer::whitespace());
        assert!(model.is_empty());
        assert_eq!(model.contexts().count(), 0);
    }

    #[test]
    fn test_build_is_order_insensitive() {
        let corpus = vec![
            "one two three four",
            "two three five",
            "one two three",
            "a b c d e f",
        ];
        let mut reversed = corpus.clone();
        reversed.reverse();
        let mut rotated = corpus.clone();
        rotated.rotate_left(2);

        let tokenizer = Tokenizer::whitespace();
        let baseline = TrigramModel::build(&corpus, &tokenizer);
        assert_eq!(baseline, TrigramModel::build(&corpus, &tokenizer));
        assert_eq!(baseline, TrigramModel::build(&reversed, &tokenizer));
        assert_eq!(baseline, TrigramModel::build(&rotated, &tokenizer));
    }

    #[test]
    fn test_every_context_has_successors() {
        let model = TrigramModel::build(
            ["a b c a b d", "b c a", "x y"],
            &Tokenizer::whitespace(),
        );
        for context in model.contexts() {
            let successors = model.successors(context).unwrap();
            assert!(!successors.is_empty());
            assert!(successors.values().all(|&count| count >= 1));
        }
    }
}
