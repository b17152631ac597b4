use anyhow::Result;
use log::{debug, error, info};
use serenity::async_trait;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::UserId;
use serenity::prelude::*;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use parrot::chatter::ChatterService;
use parrot::command_handler::send_quietly;
use parrot::commands::bang::is_bang_command;
use parrot::commands::{register_global_commands, CommandHandler};
use parrot::config::Config;
use parrot::database::Database;
use parrot::listeners::{ChatterResponder, CorpusRecorder, IncomingMessage, ListenerRegistry};
use parrot::throttle::GenerationThrottle;

struct Handler {
    command_handler: Arc<CommandHandler>,
    listeners: Arc<ListenerRegistry>,
    bot_id: OnceLock<UserId>,
}

impl Handler {
    fn new(command_handler: CommandHandler, listeners: ListenerRegistry) -> Self {
        Handler {
            command_handler: Arc::new(command_handler),
            listeners: Arc::new(listeners),
            bot_id: OnceLock::new(),
        }
    }

    fn to_incoming(&self, msg: &Message) -> IncomingMessage {
        let bot_id = self.bot_id.get().copied();
        IncomingMessage {
            scope_id: msg.channel_id.to_string(),
            guild_id: msg.guild_id.map(|id| id.to_string()),
            message_id: msg.id.to_string(),
            author_is_bot: msg.author.bot,
            mentions_bot: bot_id.map_or(false, |id| msg.mentions.iter().any(|user| user.id == id)),
            content: msg.content.clone(),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        if is_bang_command(&msg.content) {
            if let Err(e) = self.command_handler.handle_bang_command(&ctx, &msg).await {
                error!("Error handling bang command: {}", e);
                if let Err(why) = msg
                    .channel_id
                    .say(&ctx.http, "Sorry, I encountered an error processing your command.")
                    .await
                {
                    error!("Failed to send error message: {}", why);
                }
            }
            return;
        }

        let incoming = self.to_incoming(&msg);
        for reply in self.listeners.dispatch(&incoming).await {
            debug!("Replying in {}: {}", incoming.scope_id, reply);
            if let Err(why) = send_quietly(&ctx.http, msg.channel_id, &reply).await {
                error!("Failed to send generated message: {}", why);
            }
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        if self.bot_id.set(ready.user.id).is_err() {
            debug!("Bot ID already known, reconnect");
        }

        if let Err(e) = register_global_commands(&ctx).await {
            error!("❌ Failed to register global slash commands: {}", e);
        } else {
            info!("✅ Successfully registered slash commands globally");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::ApplicationCommand(command) => {
                if let Err(e) = self.command_handler.handle_slash_command(&ctx, &command).await {
                    error!("Error handling slash command '{}': {}", command.data.name, e);

                    let error_message = "❌ Sorry, I encountered an error processing your command. Please try again.";

                    // Deferred commands need an edit, everything else a fresh response
                    if command
                        .edit_original_interaction_response(&ctx.http, |response| {
                            response.content(error_message)
                        })
                        .await
                        .is_err()
                    {
                        let _ = command
                            .create_interaction_response(&ctx.http, |response| {
                                response
                                    .kind(InteractionResponseType::ChannelMessageWithSource)
                                    .interaction_response_data(|message| {
                                        message.content(error_message).ephemeral(true)
                                    })
                            })
                            .await;
                    }
                }
            }
            Interaction::Ping(_) => {
                info!("Ping interaction received - Discord health check");
            }
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Parrot Discord Bot...");

    let database = Database::new(&config.database_path).await?;
    let chatter = ChatterService::new(database)?;
    let throttle = GenerationThrottle::new(Duration::from_secs(config.generation_cooldown_secs));

    // Recorder first so a mention can already draw on the message that triggered it
    let mut listeners = ListenerRegistry::new();
    listeners
        .register(CorpusRecorder::new(chatter.clone()))
        .register(ChatterResponder::new(chatter.clone(), throttle));

    let command_handler = CommandHandler::new(chatter, listeners.len());
    let handler = Handler::new(command_handler, listeners);

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {}", e);
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Bot configured successfully. Connecting to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {:?}", why);
        return Err(anyhow::anyhow!("Failed to establish gateway connection: {}", why));
    }

    Ok(())
}
