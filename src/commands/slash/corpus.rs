//! Corpus slash commands: /corpus, /cache_messages, /purge_corpus

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;
use serenity::model::permissions::Permissions;

/// Creates corpus commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_corpus_command(),
        create_cache_messages_command(),
        create_purge_corpus_command(),
    ]
}

/// Creates the corpus stats command
fn create_corpus_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("corpus")
        .description("Show how much this channel has taught the bot")
        .to_owned()
}

/// Creates the cache_messages command (admin)
fn create_cache_messages_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("cache_messages")
        .description("Cache messages in this channel for message generation (Admin)")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .create_option(|option| {
            option
                .name("force")
                .description("Rescan the whole channel instead of only new messages")
                .kind(CommandOptionType::Boolean)
                .required(false)
        })
        .to_owned()
}

/// Creates the purge_corpus command (admin)
fn create_purge_corpus_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("purge_corpus")
        .description("Forget every cached message in this channel (Admin)")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .to_owned()
}
