//! # Bang Commands (!)
//!
//! Text-based commands prefixed with exclamation point for quick operations.
//! Messages starting with `!` never reach the corpus.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: `!generate` and `!corpus`
//! - 1.0.0: Initial implementation with info and quick commands

pub mod info;

/// Represents a parsed bang command
#[derive(Debug, Clone)]
pub struct BangCommand {
    /// The command name (without the ! prefix)
    pub name: String,
    /// Arguments passed to the command
    pub args: Vec<String>,
}

impl BangCommand {
    /// Check if the command matches a given name (case-insensitive)
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Get the first argument, if any
    pub fn first_arg(&self) -> Option<&str> {
        self.args.first().map(|s| s.as_str())
    }
}

/// Parse a bang command from input text
///
/// # Arguments
/// * `input` - The text after the `!` prefix
///
/// # Example
/// ```
/// use parrot::commands::bang::parse_bang_command;
///
/// let cmd = parse_bang_command("generate 12");
/// assert_eq!(cmd.name, "generate");
/// assert_eq!(cmd.args, vec!["12"]);
/// ```
pub fn parse_bang_command(input: &str) -> BangCommand {
    let input = input.trim();
    let mut parts = input.split_whitespace();

    let name = parts.next().unwrap_or("").to_string();
    let args: Vec<String> = parts.map(|s| s.to_string()).collect();

    BangCommand { name, args }
}

/// Get help text for all bang commands
pub fn get_help_text() -> String {
    let mut help = String::from("**Bang Commands (!)**\n\n");

    help.push_str("**Info Commands:**\n");
    help.push_str("`!help` - Show this help message\n");
    help.push_str("`!status` - Show bot status and uptime\n");
    help.push_str("`!version` - Show bot and feature versions\n");
    help.push_str("`!uptime` - Show how long the bot has been running\n\n");

    help.push_str("**Quick Commands:**\n");
    help.push_str("`!ping` - Quick ping (text only)\n");
    help.push_str("`!features` - List all features with versions\n\n");

    help.push_str("**Chatter Commands:**\n");
    help.push_str("`!generate [max_words]` - Say something in the style of this channel\n");
    help.push_str("`!corpus` - Show how many messages this channel has taught me\n");

    help
}

/// All available bang command names
pub const COMMANDS: &[&str] = &[
    // Info commands
    "help",
    "status",
    "version",
    "uptime",
    // Quick commands
    "ping",
    "features",
    // Chatter commands
    "generate",
    "corpus",
];

/// Check if a string is a valid bang command
pub fn is_valid_command(name: &str) -> bool {
    COMMANDS.iter().any(|&cmd| cmd.eq_ignore_ascii_case(name))
}

/// Whether a whole message is a known `!` command. Anything else starting
/// with `!` is ordinary chat.
pub fn is_bang_command(content: &str) -> bool {
    match content.trim().strip_prefix('!') {
        Some(rest) => is_valid_command(&parse_bang_command(rest).name),
        None => false,
    }
}
