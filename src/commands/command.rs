use std::sync::Arc;

use derive_builder::Builder;
use uuid::Uuid;

use super::Responder;

/// Commands are the operator-triggered actions the backend can run
#[derive(
    Debug, strum_macros::Display, strum_macros::IntoStaticStr, strum_macros::EnumIs, Clone,
)]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    /// Cleanly stop the backend
    Quit,

    /// Print the config the backend is using
    ShowConfig,

    /// Fetch a repository and run the fix pass over it
    ProcessRepository {
        repo_url: String,
        issue_description: String,
    },

    /// Commit the reviewed candidate edits
    CommitChanges { message: String },
}

#[derive(Debug, Clone, Builder)]
pub struct CommandEvent {
    command: Command,
    uuid: Uuid,
    responder: Arc<dyn Responder>,
}

impl CommandEvent {
    #[must_use]
    pub fn quit() -> Self {
        CommandEvent {
            command: Command::Quit,
            responder: Arc::new(()),
            uuid: Uuid::new_v4(),
        }
    }

    #[must_use]
    pub fn builder() -> CommandEventBuilder {
        CommandEventBuilder::default()
    }

    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    #[must_use]
    pub fn command(&self) -> &Command {
        &self.command
    }

    #[must_use]
    pub fn responder(&self) -> &dyn Responder {
        &self.responder
    }

    #[must_use]
    pub fn clone_responder(&self) -> Arc<dyn Responder> {
        Arc::clone(&self.responder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MockResponder;
    use std::sync::Arc;

    #[test]
    fn test_command_event_builder() {
        let uuid = Uuid::new_v4();
        let responder = Arc::new(MockResponder::new());

        let event = CommandEvent::builder()
            .command(Command::Quit)
            .uuid(uuid)
            .responder(responder.clone())
            .build()
            .unwrap();

        let dyn_responder = responder as Arc<dyn Responder>;
        assert!(event.command().is_quit());
        assert_eq!(event.uuid(), uuid);
        assert!(Arc::ptr_eq(&event.clone_responder(), &dyn_responder));
    }
}
