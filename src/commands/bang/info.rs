//! Info bang commands: !help, !ping, !status, !version, !uptime, !features

use crate::features;
use std::time::Duration;

/// Generate help response
pub fn help() -> String {
    super::get_help_text()
}

pub fn ping() -> String {
    "🏓 Pong!".to_string()
}

pub fn features_list() -> String {
    features::format_features_list()
}

/// Generate status response
pub fn status(uptime: Duration, listeners: usize, generations: i64) -> String {
    let hours = uptime.as_secs() / 3600;
    let minutes = (uptime.as_secs() % 3600) / 60;
    let seconds = uptime.as_secs() % 60;

    format!(
        "**Bot Status**\n\
        ✅ Online and operational\n\
        ⏱️ Uptime: {}h {}m {}s\n\
        👂 Message listeners: {}\n\
        🦜 Generate commands served: {}\n\
        📦 Version: {}",
        hours,
        minutes,
        seconds,
        listeners,
        generations,
        features::get_bot_version()
    )
}

/// Generate version response
pub fn version() -> String {
    let mut output = format!("**Parrot v{}**\n\n", features::get_bot_version());
    output.push_str("**Feature Versions:**\n");

    for feature in features::get_features() {
        output.push_str(&format!("• {} v{}\n", feature.name, feature.version));
    }

    output
}

/// Generate uptime response
pub fn uptime(uptime: Duration) -> String {
    let days = uptime.as_secs() / 86400;
    let hours = (uptime.as_secs() % 86400) / 3600;
    let minutes = (uptime.as_secs() % 3600) / 60;
    let seconds = uptime.as_secs() % 60;

    if days > 0 {
        format!("⏱️ Uptime: {}d {}h {}m {}s", days, hours, minutes, seconds)
    } else if hours > 0 {
        format!("⏱️ Uptime: {}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("⏱️ Uptime: {}m {}s", minutes, seconds)
    } else {
        format!("⏱️ Uptime: {}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uptime_formats() {
        assert_eq!(uptime(Duration::from_secs(42)), "⏱️ Uptime: 42s");
        assert_eq!(uptime(Duration::from_secs(125)), "⏱️ Uptime: 2m 5s");
        assert_eq!(uptime(Duration::from_secs(3 * 3600 + 61)), "⏱️ Uptime: 3h 1m 1s");
        assert_eq!(uptime(Duration::from_secs(90_061)), "⏱️ Uptime: 1d 1h 1m 1s");
    }

    #[test]
    fn test_status_mentions_listeners() {
        let output = status(Duration::from_secs(3661), 2, 17);
        assert!(output.contains("1h 1m 1s"));
        assert!(output.contains("Message listeners: 2"));
        assert!(output.contains("Generate commands served: 17"));
    }

    #[test]
    fn test_version_lists_features() {
        assert!(version().contains("Corpus Recording"));
    }
}
