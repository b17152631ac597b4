use regex::Regex;

/// Noise stripped by the strict tokenizer: links, custom emoji, and
/// user/role/channel mention markup.
const NOISE_PATTERN: &str = r"https?://\S+|www\.\S+|<a?:\w+:\d+>|<[@#][!&]?\d+>";

/// Alphanumeric words, optionally joined by internal apostrophes (don't, it's).
const WORD_PATTERN: &str = r"[a-z0-9]+(?:'[a-z0-9]+)*";

/// Splits message text into lowercase word tokens.
#[derive(Debug, Clone)]
pub enum Tokenizer {
    /// Lowercase and split on whitespace. Punctuation stays attached.
    Whitespace,
    /// Drop links and Discord markup, then keep only plain words.
    Strict { noise: Regex, word: Regex },
}

impl Tokenizer {
    pub fn whitespace() -> Self {
        Tokenizer::Whitespace
    }

    pub fn strict() -> Result<Self, regex::Error> {
        Ok(Tokenizer::Strict {
            noise: Regex::new(NOISE_PATTERN)?,
            word: Regex::new(WORD_PATTERN)?,
        })
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        match self {
            Tokenizer::Whitespace => text
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            Tokenizer::Strict { noise, word } => {
                let cleaned = noise.replace_all(text, " ").to_lowercase();
                word.find_iter(&cleaned)
                    .map(|m| m.as_str().to_string())
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_lowercases_and_keeps_punctuation() {
        let tokens = Tokenizer::whitespace().tokenize("Hello,  World!\tHow ARE you");
        assert_eq!(tokens, vec!["hello,", "world!", "how", "are", "you"]);
    }

    #[test]
    fn test_whitespace_empty_input() {
        assert!(Tokenizer::whitespace().tokenize("   \n ").is_empty());
    }

    #[test]
    fn test_strict_removes_urls_and_markup() {
        let tokenizer = Tokenizer::strict().unwrap();
        let tokens = tokenizer.tokenize(
            "Look at https://example.com/cat.png <:pog:123456> www.site.org <@!42> now",
        );
        assert_eq!(tokens, vec!["look", "at", "now"]);
    }

    #[test]
    fn test_strict_keeps_internal_apostrophes() {
        let tokenizer = Tokenizer::strict().unwrap();
        let tokens = tokenizer.tokenize("Don't stop, it's 'quoted' fine!!");
        assert_eq!(tokens, vec!["don't", "stop", "it's", "quoted", "fine"]);
    }

    #[test]
    fn test_strict_animated_emoji_does_not_glue_words() {
        let tokenizer = Tokenizer::strict().unwrap();
        let tokens = tokenizer.tokenize("foo<a:dance:987>bar");
        assert_eq!(tokens, vec!["foo", "bar"]);
    }
}
