use crate::backfill;
use crate::chatter::ChatterService;
use crate::commands::bang::{self, parse_bang_command};
use crate::commands::replies;
use crate::commands::slash::{get_boolean_option, get_integer_option, get_number_option};
use crate::config::{GenerationConfig, GenerationUpdate};
use anyhow::Result;
use log::{info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::builder::CreateMessage;
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::id::ChannelId;
use serenity::prelude::Context;
use std::time::Instant;

#[derive(Clone)]
pub struct CommandHandler {
    chatter: ChatterService,
    start_time: Instant,
    listener_count: usize,
}

impl CommandHandler {
    pub fn new(chatter: ChatterService, listener_count: usize) -> Self {
        CommandHandler {
            chatter,
            start_time: Instant::now(),
            listener_count,
        }
    }

    pub async fn handle_slash_command(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        let user_id = command.user.id.to_string();
        info!("Processing slash command: {} from user: {}", command.data.name, user_id);
        self.chatter.database().log_usage(&user_id, &command.data.name).await?;

        match command.data.name.as_str() {
            "ping" => respond(ctx, command, &bang::info::ping(), false).await,
            "help" => respond(ctx, command, SLASH_HELP, true).await,
            "generate" => self.handle_slash_generate(ctx, command).await,
            "generator" => self.handle_slash_generator(ctx, command).await,
            "corpus" => self.handle_slash_corpus(ctx, command).await,
            "cache_messages" => self.handle_slash_cache_messages(ctx, command).await,
            "purge_corpus" => self.handle_slash_purge_corpus(ctx, command).await,
            _ => {
                respond(
                    ctx,
                    command,
                    "Unknown command. Use `/help` to see available commands.",
                    true,
                )
                .await
            }
        }
    }

    async fn handle_slash_generate(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        let (channel, scope) = scopes(command);
        let config = self.chatter.config_for(&scope).await?;
        if !config.enabled {
            return respond(ctx, command, replies::DISABLED, true).await;
        }

        let update = GenerationUpdate {
            max_words: get_integer_option(&command.data.options, "max_words"),
            temperature: get_number_option(&command.data.options, "temperature"),
            ..Default::default()
        };
        let config = match config.apply(&update) {
            Ok(config) => config,
            Err(e) => return respond(ctx, command, &replies::config_rejected(&e), true).await,
        };

        let text = match self.chatter.generate_with(&channel, &config).await {
            Ok(text) => text,
            Err(e) => return respond(ctx, command, &replies::generation_failed(&e), true).await,
        };
        respond(ctx, command, &text, false).await
    }

    async fn handle_slash_generator(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        let (_, scope) = scopes(command);
        let options = &command.data.options;
        let current = self.chatter.config_for(&scope).await?;

        let update = GenerationUpdate {
            enabled: get_boolean_option(options, "enabled"),
            temperature: get_number_option(options, "temperature"),
            max_words: get_integer_option(options, "max_words"),
            trigger_probability: get_number_option(options, "trigger_probability"),
            continuation_probability: get_number_option(options, "continuation_probability"),
            strict_tokens: get_boolean_option(options, "strict_tokens"),
        };
        if update.is_empty() {
            return respond(ctx, command, &replies::format_config(&current), true).await;
        }

        match current.apply(&update) {
            Ok(updated) => {
                self.chatter.save_config(&scope, &updated).await?;
                info!("Generator settings for {} changed by {}", scope, command.user.id);
                let message = format!("✅ Settings updated.\n{}", replies::format_config(&updated));
                respond(ctx, command, &message, true).await
            }
            Err(e) => {
                warn!("Rejected generator settings for {}: {}", scope, e);
                respond(ctx, command, &replies::config_rejected(&e), true).await
            }
        }
    }

    async fn handle_slash_corpus(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        let (channel, scope) = scopes(command);
        let config = self.chatter.config_for(&scope).await?;
        let stats = self.chatter.corpus_stats(&channel, &config).await?;
        respond(ctx, command, &replies::format_corpus_stats(&stats), true).await
    }

    async fn handle_slash_cache_messages(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        let force = get_boolean_option(&command.data.options, "force").unwrap_or(false);
        let guild_id = command.guild_id.map(|id| id.to_string());

        // Paging a long history easily takes longer than the 3 second reply window
        command
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::DeferredChannelMessageWithSource)
                    .interaction_response_data(|message| message.ephemeral(true))
            })
            .await?;

        let message = match backfill::cache_channel(
            &ctx.http,
            &self.chatter,
            command.channel_id,
            guild_id.as_deref(),
            force,
        )
        .await
        {
            Ok(stored) => format!("✅ Message caching complete! {} new message(s) stored.", stored),
            Err(e) => {
                warn!("Caching channel {} failed: {}", command.channel_id, e);
                "❌ Caching stopped early. Check that I can read this channel's history.".to_string()
            }
        };

        command
            .edit_original_interaction_response(&ctx.http, |response| response.content(message))
            .await?;
        Ok(())
    }

    async fn handle_slash_purge_corpus(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        let (channel, _) = scopes(command);
        let removed = self.chatter.purge(&channel).await?;
        let message = format!("🧹 Forgot {} cached message(s) from this channel.", removed);
        respond(ctx, command, &message, true).await
    }

    /// Handle a `!` command typed in a channel.
    pub async fn handle_bang_command(&self, ctx: &Context, msg: &Message) -> Result<()> {
        let input = msg.content.trim().trim_start_matches('!');
        let command = parse_bang_command(input);
        if !bang::is_valid_command(&command.name) {
            return Ok(());
        }

        let user_id = msg.author.id.to_string();
        info!("Processing command: !{} from user: {}", command.name, user_id);
        self.chatter.database().log_usage(&user_id, &command.name.to_lowercase()).await?;

        let channel = msg.channel_id.to_string();
        let scope = msg
            .guild_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| channel.clone());

        let reply = if command.is("help") {
            bang::info::help()
        } else if command.is("ping") {
            bang::info::ping()
        } else if command.is("status") {
            let generations = self.chatter.database().usage_count("generate").await?;
            bang::info::status(self.start_time.elapsed(), self.listener_count, generations)
        } else if command.is("version") {
            bang::info::version()
        } else if command.is("uptime") {
            bang::info::uptime(self.start_time.elapsed())
        } else if command.is("features") {
            bang::info::features_list()
        } else if command.is("corpus") {
            let config = self.chatter.config_for(&scope).await?;
            let stats = self.chatter.corpus_stats(&channel, &config).await?;
            replies::format_corpus_stats(&stats)
        } else if command.is("generate") {
            self.bang_generate(&channel, &scope, command.first_arg()).await?
        } else {
            return Ok(());
        };

        send_quietly(&ctx.http, msg.channel_id, &reply).await
    }

    async fn bang_generate(&self, channel: &str, scope: &str, arg: Option<&str>) -> Result<String> {
        let config = self.chatter.config_for(scope).await?;
        if !config.enabled {
            return Ok(replies::DISABLED.to_string());
        }

        let max_words = match replies::parse_max_words(arg) {
            Ok(max_words) => max_words.unwrap_or(config.max_words),
            Err(message) => return Ok(message),
        };
        let config = GenerationConfig { max_words, ..config };

        Ok(match self.chatter.generate_with(channel, &config).await {
            Ok(text) => text,
            Err(e) => replies::generation_failed(&e),
        })
    }
}

const SLASH_HELP: &str = r#"**Available Slash Commands:**
`/ping` - Test bot responsiveness
`/help` - Show this help message
`/generate [max_words] [temperature]` - Say something in the style of this channel
`/corpus` - Show how much this channel has taught me

**Admin Commands:**
`/generator` - Show or change this server's generator settings
`/cache_messages [force]` - Learn from this channel's existing history
`/purge_corpus` - Forget everything learned in this channel

Mention me and I'll answer in the channel's own words. Type `!help` for text commands."#;

/// Corpus scope (the channel) and settings scope (the guild, or the channel in DMs).
fn scopes(command: &ApplicationCommandInteraction) -> (String, String) {
    let channel = command.channel_id.to_string();
    let scope = command
        .guild_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| channel.clone());
    (channel, scope)
}

/// Post text to a channel without pinging anyone it happens to mention.
/// Generated text replays corpus content, `@everyone` included.
pub async fn send_quietly(http: &Http, channel_id: ChannelId, content: &str) -> Result<()> {
    channel_id
        .send_message(http, |message| quiet_message(message, content))
        .await?;
    Ok(())
}

fn quiet_message<'a, 'b>(message: &'b mut CreateMessage<'a>, content: &str) -> &'b mut CreateMessage<'a> {
    message
        .content(replies::fit_message(content))
        .allowed_mentions(|mentions| mentions.empty_parse())
}

async fn respond(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: &str,
    ephemeral: bool,
) -> Result<()> {
    let content = replies::fit_message(content);
    command
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| {
                    message
                        .content(content)
                        .ephemeral(ephemeral)
                        .allowed_mentions(|mentions| mentions.empty_parse())
                })
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_message_blocks_pings_and_fits_limit() {
        let mut message = CreateMessage::default();
        let replayed = "@everyone <@1234> ".repeat(200);
        quiet_message(&mut message, &replayed);

        let content = message.0.get("content").and_then(|v| v.as_str()).unwrap();
        assert!(content.chars().count() <= replies::MESSAGE_LIMIT);
        assert!(content.starts_with("@everyone"));

        let parse = &message.0["allowed_mentions"]["parse"];
        assert_eq!(parse.as_array().map(|values| values.len()), Some(0));
    }

    #[test]
    fn test_slash_help_mentions_every_command() {
        for name in ["/ping", "/help", "/generate", "/corpus", "/generator", "/cache_messages", "/purge_corpus"] {
            assert!(SLASH_HELP.contains(name), "help is missing {}", name);
        }
    }
}
