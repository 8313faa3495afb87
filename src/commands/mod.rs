mod command;
mod handler;
mod responder;

pub use command::{Command, CommandEvent, CommandEventBuilder};
pub use handler::{commit_changes, process_repository, CommandHandler};
pub use responder::{CommandResponse, Responder};

#[cfg(test)]
pub use responder::MockResponder;
