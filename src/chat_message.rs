use derive_builder::Builder;
use uuid::Uuid;

/// A message in the frontend's output feed
#[derive(Debug, Clone, Default, Builder)]
#[builder(setter(into, strip_option), build_fn(skip))]
pub struct ChatMessage {
    role: ChatRole,
    content: String,
    uuid: Option<Uuid>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIs,
)]
pub enum ChatRole {
    User,
    #[default]
    System,
    /// A rendered candidate-edit diff; displayed verbatim
    Diff,
    Error,
}

impl ChatMessage {
    pub fn new_user(msg: impl Into<String>) -> ChatMessageBuilder {
        ChatMessageBuilder::default()
            .role(ChatRole::User)
            .content(msg.into())
            .to_owned()
    }

    pub fn new_system(msg: impl Into<String>) -> ChatMessageBuilder {
        ChatMessageBuilder::default()
            .role(ChatRole::System)
            .content(msg.into())
            .to_owned()
    }

    pub fn new_diff(msg: impl Into<String>) -> ChatMessageBuilder {
        ChatMessageBuilder::default()
            .role(ChatRole::Diff)
            .content(msg.into())
            .to_owned()
    }

    pub fn new_error(msg: impl Into<String>) -> ChatMessageBuilder {
        ChatMessageBuilder::default()
            .role(ChatRole::Error)
            .content(msg.into())
            .to_owned()
    }

    pub fn uuid(&self) -> Option<Uuid> {
        self.uuid
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn role(&self) -> &ChatRole {
        &self.role
    }
}

impl ChatMessageBuilder {
    // Building is infallible
    pub fn build(&mut self) -> ChatMessage {
        ChatMessage {
            content: self.content.clone().unwrap_or_default(),
            uuid: self.uuid.unwrap_or_default(),
            role: self.role.unwrap_or_default(),
        }
    }
}
