//! # Slash Commands (/)
//!
//! Discord native slash commands with validation.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Generator and corpus commands
//! - 1.0.0: Reorganized from monolithic slash_commands.rs

mod corpus;
mod generator;
mod utility;

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::Command;
use serenity::model::application::interaction::application_command::CommandDataOption;
use serenity::prelude::Context;

/// Creates all slash command definitions
pub fn create_slash_commands() -> Vec<CreateApplicationCommand> {
    let mut commands = Vec::new();

    // Utility commands
    commands.extend(utility::create_commands());

    // Generation commands
    commands.extend(generator::create_commands());

    // Corpus management
    commands.extend(corpus::create_commands());

    commands
}

/// Registers all slash commands globally
pub async fn register_global_commands(ctx: &Context) -> Result<()> {
    let slash_commands = create_slash_commands();

    Command::set_global_application_commands(&ctx.http, |commands| {
        for command in slash_commands {
            commands.add_application_command(command);
        }
        commands
    })
    .await?;

    info!("Global slash commands registered successfully");
    Ok(())
}

fn find_option<'a>(options: &'a [CommandDataOption], name: &str) -> Option<&'a CommandDataOption> {
    options.iter().find(|opt| opt.name == name)
}

/// Utility function to get integer option from slash command
pub fn get_integer_option(options: &[CommandDataOption], name: &str) -> Option<i64> {
    find_option(options, name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_i64())
}

/// Utility function to get number (float) option from slash command
pub fn get_number_option(options: &[CommandDataOption], name: &str) -> Option<f64> {
    find_option(options, name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_f64())
}

/// Utility function to get boolean option from slash command
pub fn get_boolean_option(options: &[CommandDataOption], name: &str) -> Option<bool> {
    find_option(options, name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_bool())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_names() -> Vec<String> {
        create_slash_commands()
            .iter()
            .map(|cmd| {
                cmd.0
                    .get("name")
                    .unwrap()
                    .as_str()
                    .unwrap()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_create_slash_commands() {
        let command_names = command_names();

        let expected_commands = vec![
            "ping",
            "help",
            "generate",
            "generator",
            "corpus",
            "cache_messages",
            "purge_corpus",
        ];

        assert_eq!(command_names.len(), expected_commands.len());
        for expected in expected_commands {
            assert!(
                command_names.contains(&expected.to_string()),
                "Missing command: {}",
                expected
            );
        }
    }

    #[test]
    fn test_missing_options() {
        // Discord builds CommandDataOption values, only the absent case is constructible here
        let options = vec![];
        assert_eq!(get_integer_option(&options, "max_words"), None);
        assert_eq!(get_number_option(&options, "temperature"), None);
        assert_eq!(get_boolean_option(&options, "force"), None);
    }
}
