//! # Feature: History Backfill
//!
//! Pulls a channel's existing history into the corpus so the generator has
//! something to work with before the bot has seen much live traffic.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Incremental paging from the newest cached message, forced full rescan

use crate::chatter::ChatterService;
use anyhow::Result;
use log::{debug, info};
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::id::{ChannelId, MessageId};
use std::sync::Arc;

/// Discord's page size limit for channel history.
const PAGE_SIZE: u64 = 100;

/// Where paging should start: after the newest cached message, or from the
/// very beginning of the channel when `force` is set or nothing is cached.
pub fn resume_point(latest_cached: Option<&str>, force: bool) -> u64 {
    if force {
        return 0;
    }
    latest_cached.and_then(|id| id.parse::<u64>().ok()).unwrap_or(0)
}

/// Messages from one history page worth storing, oldest first.
fn storable(page: &[Message]) -> Vec<&Message> {
    let mut messages: Vec<&Message> = page
        .iter()
        .filter(|msg| !msg.author.bot && !msg.content.trim().is_empty())
        .collect();
    messages.sort_by_key(|msg| msg.id);
    messages
}

/// Cache a channel's history. Returns how many new messages were stored.
pub async fn cache_channel(
    http: &Arc<Http>,
    chatter: &ChatterService,
    channel_id: ChannelId,
    guild_id: Option<&str>,
    force: bool,
) -> Result<usize> {
    let scope_id = channel_id.to_string();
    let latest = chatter.latest_message_id(&scope_id).await?;
    let mut after = resume_point(latest.as_deref(), force);

    debug!("Starting message caching for channel {} after {}", scope_id, after);

    let mut stored = 0;
    loop {
        let page = channel_id
            .messages(http, |retriever| retriever.after(MessageId(after)).limit(PAGE_SIZE))
            .await?;

        let newest = match page.iter().map(|msg| msg.id.0).max() {
            Some(newest) => newest,
            None => break,
        };

        for msg in storable(&page) {
            let id = msg.id.to_string();
            if chatter.observe(&scope_id, &id, &msg.content, guild_id).await? {
                stored += 1;
            }
        }

        if (page.len() as u64) < PAGE_SIZE || newest <= after {
            break;
        }
        after = newest;
    }

    info!("Cached {} new message(s) for channel {}", stored, scope_id);
    Ok(stored)
}
