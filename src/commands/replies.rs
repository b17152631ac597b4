//! Reply text shared by the slash and bang versions of the chatter commands.

use crate::chatter::CorpusStats;
use crate::config::{validate_max_words, ConfigError, GenerationConfig};
use crate::markov::GenerationError;
use log::error;

/// Discord rejects message content longer than this many characters.
pub const MESSAGE_LIMIT: usize = 2000;

pub const DISABLED: &str = "🔇 Generated replies are switched off in this server. An admin can turn them on with `/generator enabled:true`.";

/// Parse the optional `!generate` length argument.
pub fn parse_max_words(arg: Option<&str>) -> Result<Option<usize>, String> {
    match arg {
        None => Ok(None),
        Some(raw) => {
            let value = raw
                .parse::<i64>()
                .map_err(|_| format!("❌ `{}` is not a number of words.", raw))?;
            validate_max_words(value)
                .map(Some)
                .map_err(|e| config_rejected(&e))
        }
    }
}

/// Cut text down to [`MESSAGE_LIMIT`] characters, preferring a word boundary.
pub fn fit_message(text: &str) -> String {
    let cut = match text.char_indices().nth(MESSAGE_LIMIT) {
        Some((index, _)) => index,
        None => return text.to_string(),
    };
    let head = &text[..cut];
    match head.rfind(' ') {
        Some(space) if space > 0 => head[..space].to_string(),
        _ => head.to_string(),
    }
}

pub fn config_rejected(err: &ConfigError) -> String {
    format!("❌ {}", err)
}

/// What to tell the channel when generation did not produce text.
pub fn generation_failed(err: &GenerationError) -> String {
    match err {
        GenerationError::EmptyCorpus => {
            "🦜 I haven't heard enough in this channel yet. Keep talking, or ask an admin to run `/cache_messages`.".to_string()
        }
        other => {
            error!("Generation failed: {}", other);
            "❌ Sorry, something went wrong while generating a message.".to_string()
        }
    }
}

pub fn format_corpus_stats(stats: &CorpusStats) -> String {
    format!(
        "**Channel Corpus**\n\
        📝 Cached messages: {}\n\
        🔗 Word pairs learned: {}",
        stats.messages, stats.contexts
    )
}

pub fn format_config(config: &GenerationConfig) -> String {
    match serde_json::to_string_pretty(config) {
        Ok(json) => format!("**Generator Settings**\n```json\n{}\n```", json),
        Err(e) => {
            error!("Failed to render generator settings: {}", e);
            format!("**Generator Settings**\n{:?}", config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_max_words() {
        assert_eq!(parse_max_words(None), Ok(None));
        assert_eq!(parse_max_words(Some("12")), Ok(Some(12)));
        assert!(parse_max_words(Some("twelve")).unwrap_err().contains("not a number"));
        assert!(parse_max_words(Some("1")).unwrap_err().contains("max_words"));
        assert!(parse_max_words(Some("1000")).is_err());
    }

    #[test]
    fn test_fit_message_short_text_untouched() {
        assert_eq!(fit_message("the cat sat"), "the cat sat");
        let exact = "a".repeat(MESSAGE_LIMIT);
        assert_eq!(fit_message(&exact), exact);
    }

    #[test]
    fn test_fit_message_cuts_at_word_boundary() {
        let words = vec!["meow"; 600].join(" ");
        let fitted = fit_message(&words);
        assert!(fitted.chars().count() <= MESSAGE_LIMIT);
        assert!(fitted.ends_with("meow"));
        assert!(words.starts_with(&fitted));
    }

    #[test]
    fn test_fit_message_long_token_and_multibyte() {
        let token = "🦜".repeat(MESSAGE_LIMIT + 50);
        let fitted = fit_message(&token);
        assert_eq!(fitted.chars().count(), MESSAGE_LIMIT);
    }

    #[test]
    fn test_generation_failed_messages() {
        assert!(generation_failed(&GenerationError::EmptyCorpus).contains("/cache_messages"));
        let other = GenerationError::InvariantViolation("bad".to_string());
        assert!(generation_failed(&other).contains("went wrong"));
    }

    #[test]
    fn test_format_config_is_json() {
        let output = format_config(&GenerationConfig::default());
        assert!(output.contains("\"temperature\": 1.0"));
        assert!(output.contains("\"max_words\": 20"));
        assert!(output.contains("\"strict_tokens\": false"));
    }

    #[test]
    fn test_format_corpus_stats() {
        let output = format_corpus_stats(&CorpusStats { messages: 7, contexts: 31 });
        assert!(output.contains("Cached messages: 7"));
        assert!(output.contains("Word pairs learned: 31"));
    }
}
