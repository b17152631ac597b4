//! # Command System
//!
//! Unified command handling for slash commands (/) and bang commands (!).
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Chatter commands, shared reply text
//! - 1.0.0: Initial reorganization with modular command structure

pub mod bang;
pub mod replies;
pub mod slash;

// Re-export the CommandHandler from the handler module
pub use crate::command_handler::CommandHandler;

// Re-export commonly used items from submodules
pub use bang::{parse_bang_command, BangCommand};
pub use slash::{
    create_slash_commands, get_boolean_option, get_integer_option, get_number_option,
    register_global_commands,
};
