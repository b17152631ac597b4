pub mod backfill;
pub mod chatter;
pub mod command_handler;
pub mod commands;
pub mod config;
pub mod database;
pub mod features;
pub mod listeners;
pub mod markov;
pub mod throttle;
