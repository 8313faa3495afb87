pub mod agent;
pub mod chat_message;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fixer;
pub mod frontend;
pub mod git;
pub mod lang;
pub mod repofix_tracing;
pub mod session;
