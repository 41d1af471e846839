//! `modctl`: the moderation console on the command line.

pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod transport;
