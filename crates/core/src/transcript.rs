use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// Distinguishes inline images from plain text entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
}

/// A single entry of the conversation.
///
/// Fields are private so a message cannot change once it has been built.
/// Image messages carry a `data:` URL as their content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    role: Role,
    #[serde(rename = "type")]
    kind: MessageKind,
    content: String,
}

impl Message {
    fn new(role: Role, kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            role,
            kind,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, MessageKind::Text, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, MessageKind::Text, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, MessageKind::Text, content)
    }

    /// An assistant message holding an image as a data URL.
    pub fn image(data_url: impl Into<String>) -> Self {
        Self::new(Role::Assistant, MessageKind::Image, data_url)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_image(&self) -> bool {
        self.kind == MessageKind::Image
    }
}

/// The chronological log of one session.
///
/// Append-only: there is no way to remove, reorder or edit an entry.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Every non-image entry, in order. This is the history a chat model sees.
    pub fn chat_history(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| !m.is_image())
    }
}
