//! # Feature Registry
//!
//! Central registry for all bot features with version tracking.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Registry narrowed to the channel chatter features
//! - 1.0.0: Initial feature registry implementation

/// Describes a versioned bot feature
#[derive(Debug, Clone)]
pub struct Feature {
    /// Feature identifier (snake_case)
    pub id: &'static str,
    /// Human-readable name
    pub name: &'static str,
    /// Current semantic version
    pub version: &'static str,
    /// Bot version when feature was added
    pub since: &'static str,
    /// Can be switched per guild with `/generator`
    pub toggleable: bool,
    /// Brief description
    pub description: &'static str,
}

/// All registered features
pub const FEATURES: &[Feature] = &[
    Feature {
        id: "corpus_recording",
        name: "Corpus Recording",
        version: "1.0.0",
        since: "0.1.0",
        toggleable: false,
        description: "Stores every human message per channel for the generator",
    },
    Feature {
        id: "trigram_generation",
        name: "Trigram Generation",
        version: "1.0.0",
        since: "0.1.0",
        toggleable: true,
        description: "Markov-chain replies with temperature-scaled sampling",
    },
    Feature {
        id: "strict_tokens",
        name: "Strict Tokenizer",
        version: "1.0.0",
        since: "0.2.0",
        toggleable: true,
        description: "Drops links, emoji and mention markup before counting trigrams",
    },
    Feature {
        id: "history_backfill",
        name: "History Backfill",
        version: "1.0.0",
        since: "0.1.0",
        toggleable: false,
        description: "Caches a channel's existing history into the corpus",
    },
    Feature {
        id: "reply_throttle",
        name: "Reply Throttle",
        version: "1.0.0",
        since: "0.1.0",
        toggleable: false,
        description: "Per-channel cooldown for unprompted replies",
    },
];

/// Get all registered features
pub fn get_features() -> &'static [Feature] {
    FEATURES
}

/// Get bot version from Cargo.toml
pub fn get_bot_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Format features as a display string
pub fn format_features_list() -> String {
    let mut output = format!("📦 Bot Features (v{})\n\n", get_bot_version());
    output.push_str("Feature              Version  Per-guild\n");
    output.push_str("────────────────────────────────────────\n");

    for feature in FEATURES {
        let toggle_str = if feature.toggleable { "Yes" } else { "No" };
        output.push_str(&format!(
            "{:<20} {:<8} {}\n",
            feature.name, feature.version, toggle_str
        ));
    }

    output.push_str("\nUse /generator to change per-guild settings.");
    output
}
