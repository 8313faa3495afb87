use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::task::AbortOnDropHandle;
use uuid::Uuid;

use crate::{
    chat_message::ChatMessage,
    commands::{CommandResponse, Responder},
};

use super::ui_event::UIEvent;

/// Handles responses from commands application wide
///
/// Basically converts command responses into UI events
/// The responder is sent with commands so that the backend has a way to
/// communicate with the frontend, without knowing about the frontend
///
/// Only one is expected to be running at a time
#[derive(Debug)]
pub struct AppCommandResponder {
    tx: mpsc::UnboundedSender<CommandResponse>,
    #[allow(dead_code)]
    handle: AbortOnDropHandle<()>,
}

#[derive(Debug, Clone)]
pub struct AppCommandResponderForCommand {
    inner: mpsc::UnboundedSender<CommandResponse>,
    uuid: Uuid,
}

impl AppCommandResponder {
    pub fn spawn_for(ui_tx: mpsc::UnboundedSender<UIEvent>) -> AppCommandResponder {
        tracing::debug!("Initializing app command responder");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(async move {
            while let Some(response) = rx.recv().await {
                let ui_event = match response {
                    CommandResponse::BackendMessage(uuid, msg) => {
                        UIEvent::ChatMessage(ChatMessage::new_system(msg).uuid(uuid).build())
                    }
                    CommandResponse::Diff(uuid, diff) => {
                        UIEvent::ChatMessage(ChatMessage::new_diff(diff).uuid(uuid).build())
                    }
                    CommandResponse::Error(uuid, msg) => {
                        UIEvent::ChatMessage(ChatMessage::new_error(msg).uuid(uuid).build())
                    }
                    CommandResponse::Activity(uuid, state) => UIEvent::ActivityUpdate(uuid, state),
                    CommandResponse::Completed(uuid) => UIEvent::CommandDone(uuid),
                };

                if let Err(err) = ui_tx.send(ui_event) {
                    tracing::error!("Failed to send response to ui: {:#}", err);
                }
            }
            tracing::debug!("App command responder shutting down");
        });

        AppCommandResponder {
            tx,
            handle: AbortOnDropHandle::new(handle),
        }
    }

    #[must_use]
    pub fn for_command(&self, uuid: Uuid) -> Arc<dyn Responder> {
        Arc::new(AppCommandResponderForCommand {
            inner: self.tx.clone(),
            uuid,
        }) as Arc<dyn Responder>
    }
}

impl Responder for AppCommandResponderForCommand {
    fn send(&self, response: CommandResponse) {
        let response = response.with_uuid(self.uuid);
        if let Err(err) = self.inner.send(response) {
            tracing::error!("Failed to send response for command: {:?}", err);
        }
    }

    fn system_message(&self, message: &str) {
        self.send(CommandResponse::BackendMessage(self.uuid, message.into()));
    }

    fn update(&self, state: &str) {
        self.send(CommandResponse::Activity(self.uuid, state.into()));
    }

    fn diff(&self, diff: &str) {
        self.send(CommandResponse::Diff(self.uuid, diff.into()));
    }

    fn error(&self, message: &str) {
        self.send(CommandResponse::Error(self.uuid, message.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    const TEST_UUID: Uuid = Uuid::from_u128(0x1234_5678_90ab_cdef_1234_5678_90ab_cdef);

    #[tokio::test]
    async fn test_app_responder() {
        let (ui_tx, mut ui_rx) = mpsc::unbounded_channel();
        let app = AppCommandResponder::spawn_for(ui_tx);

        let responder = app.for_command(TEST_UUID);

        responder.system_message("Test message");

        let Some(ui_event) = ui_rx.recv().await else {
            panic!("No UI event received");
        };

        match ui_event {
            UIEvent::ChatMessage(received_message) => {
                assert_eq!(received_message.uuid(), Some(TEST_UUID));
                assert_eq!(received_message.content(), "Test message");
            }
            _ => panic!("Unexpected UI event received"),
        }

        responder.send(CommandResponse::Completed(Uuid::new_v4()));

        // The responder retags every response with its own uuid
        if let Some(ui_event) = ui_rx.recv().await {
            match ui_event {
                UIEvent::CommandDone(received_uuid) => assert_eq!(received_uuid, TEST_UUID),
                _ => panic!("Unexpected UI event received"),
            }
        } else {
            panic!("No UI event received");
        }
    }

    #[tokio::test]
    async fn test_error_becomes_error_feed_message() {
        let (ui_tx, mut ui_rx) = mpsc::unbounded_channel();
        let app = AppCommandResponder::spawn_for(ui_tx);

        let responder = app.for_command(TEST_UUID);
        responder.error("Failed to handle command: boom");

        let Some(UIEvent::ChatMessage(message)) = ui_rx.recv().await else {
            panic!("No UI event received");
        };

        assert!(message.role().is_error());
        assert_eq!(message.content(), "Failed to handle command: boom");
        assert_eq!(message.uuid(), Some(TEST_UUID));
    }

    #[tokio::test]
    async fn test_diff_becomes_feed_message() {
        let (ui_tx, mut ui_rx) = mpsc::unbounded_channel();
        let app = AppCommandResponder::spawn_for(ui_tx);

        let responder = app.for_command(TEST_UUID);
        responder.diff("--- a\n+++ b");

        let Some(UIEvent::ChatMessage(message)) = ui_rx.recv().await else {
            panic!("No UI event received");
        };

        assert!(message.role().is_diff());
        assert_eq!(message.content(), "--- a\n+++ b");
    }
}
