//! Generation slash commands: /generate, /generator

use crate::config::{MAX_TEMPERATURE, MAX_WORDS, MIN_WORDS};
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;
use serenity::model::permissions::Permissions;

/// Creates generation commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_generate_command(), create_generator_command()]
}

/// Creates the generate command
fn create_generate_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("generate")
        .description("Say something in the style of this channel")
        .create_option(|option| {
            option
                .name("max_words")
                .description("Upper bound on the reply length")
                .kind(CommandOptionType::Integer)
                .min_int_value(MIN_WORDS as u64)
                .max_int_value(MAX_WORDS as u64)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("temperature")
                .description("0 = most likely words only, 1 = as observed, higher = wilder")
                .kind(CommandOptionType::Number)
                .min_number_value(0.0)
                .max_number_value(MAX_TEMPERATURE)
                .required(false)
        })
        .to_owned()
}

/// Creates the generator settings command (admin)
fn create_generator_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("generator")
        .description("Show or change this server's generator settings (Admin)")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .create_option(|option| {
            option
                .name("enabled")
                .description("Allow generated replies in this server")
                .kind(CommandOptionType::Boolean)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("temperature")
                .description("Sampling temperature (0 = greedy)")
                .kind(CommandOptionType::Number)
                .min_number_value(0.0)
                .max_number_value(MAX_TEMPERATURE)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("max_words")
                .description("Upper bound on reply length")
                .kind(CommandOptionType::Integer)
                .min_int_value(MIN_WORDS as u64)
                .max_int_value(MAX_WORDS as u64)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("trigger_probability")
                .description("Chance (0-1) of replying to an unprompted message")
                .kind(CommandOptionType::Number)
                .min_number_value(0.0)
                .max_number_value(1.0)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("continuation_probability")
                .description("Chance (0-1) to keep going from a fresh seed at a dead end")
                .kind(CommandOptionType::Number)
                .min_number_value(0.0)
                .max_number_value(1.0)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("strict_tokens")
                .description("Ignore links, emoji and mentions when learning")
                .kind(CommandOptionType::Boolean)
                .required(false)
        })
        .to_owned()
}
