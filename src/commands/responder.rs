use std::sync::Arc;

#[cfg(test)]
use mockall::automock;
use uuid::Uuid;

/// Updates a command sends back while (and after) it runs
#[derive(Debug, Clone)]
pub enum CommandResponse {
    /// Informational messages from the backend
    BackendMessage(Uuid, String),
    /// Short activity updates (which file is being fetched or fixed)
    Activity(Uuid, String),
    /// A rendered candidate-edit diff for review
    Diff(Uuid, String),
    /// Something went wrong; displayed more loudly than a backend message
    Error(Uuid, String),
    /// The command has finished, successfully or not
    Completed(Uuid),
}

impl CommandResponse {
    #[must_use]
    pub fn with_uuid(self, uuid: Uuid) -> Self {
        match self {
            CommandResponse::BackendMessage(_, msg) => CommandResponse::BackendMessage(uuid, msg),
            CommandResponse::Activity(_, state) => CommandResponse::Activity(uuid, state),
            CommandResponse::Diff(_, diff) => CommandResponse::Diff(uuid, diff),
            CommandResponse::Error(_, msg) => CommandResponse::Error(uuid, msg),
            CommandResponse::Completed(_) => CommandResponse::Completed(uuid),
        }
    }
}

/// A responder reacts to updates from commands
///
/// The backend defines the interface; the frontend decides how responses
/// are displayed.
#[cfg_attr(test, automock)]
pub trait Responder: std::fmt::Debug + Send + Sync {
    /// Generic handler for command responses
    fn send(&self, response: CommandResponse);

    /// Informational messages from the backend
    fn system_message(&self, message: &str);

    /// State updates with a message from the backend
    fn update(&self, state: &str);

    /// A rendered diff of one candidate edit
    fn diff(&self, diff: &str);

    /// Failures the operator should notice
    fn error(&self, message: &str);
}

impl Responder for tokio::sync::mpsc::UnboundedSender<CommandResponse> {
    fn send(&self, response: CommandResponse) {
        let _ = self.send(response);
    }

    fn system_message(&self, message: &str) {
        let _ = self.send(CommandResponse::BackendMessage(
            Uuid::default(),
            message.to_string(),
        ));
    }

    fn update(&self, state: &str) {
        let _ = self.send(CommandResponse::Activity(
            Uuid::default(),
            state.to_string(),
        ));
    }

    fn diff(&self, diff: &str) {
        let _ = self.send(CommandResponse::Diff(Uuid::default(), diff.to_string()));
    }

    fn error(&self, message: &str) {
        let _ = self.send(CommandResponse::Error(Uuid::default(), message.to_string()));
    }
}

impl Responder for Arc<dyn Responder> {
    fn send(&self, response: CommandResponse) {
        self.as_ref().send(response);
    }

    fn system_message(&self, message: &str) {
        self.as_ref().system_message(message);
    }

    fn update(&self, state: &str) {
        self.as_ref().update(state);
    }

    fn diff(&self, diff: &str) {
        self.as_ref().diff(diff);
    }

    fn error(&self, message: &str) {
        self.as_ref().error(message);
    }
}

// noop responder
impl Responder for () {
    fn send(&self, _response: CommandResponse) {}

    fn system_message(&self, _message: &str) {}

    fn update(&self, _state: &str) {}

    fn diff(&self, _diff: &str) {}

    fn error(&self, _message: &str) {}
}
