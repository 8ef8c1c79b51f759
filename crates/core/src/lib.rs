pub mod assistant;
pub mod chat;
pub mod classifier;
pub mod error;
pub mod image;
pub mod language;
pub mod session;
pub mod transcript;

use crate::language::Locale;
use crate::transcript::Message;
use serde::Serialize;

/// Represents commands that the core logic issues to the browser bridge.
///
/// This enum is the only way the session talks to the presentation layer.
/// The runtime decides how each intent is delivered (the api service turns
/// them into WebSocket frames).
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Ask the browser to start speech recognition.
    StartListening,
    /// Place recognized speech into the chat input field.
    FillInput(String),
    /// A call to an external service is in flight; show a spinner.
    Pending(Activity),
    /// Render a message that was just appended to the transcript.
    Show(Message),
    /// Speak the given text with the browser's speech synthesis.
    Speak { text: String, locale: Locale },
}

/// Inbound events arriving from the browser side of the bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// The user submitted text from the chat input.
    Submit(String),
    /// The microphone button was tapped.
    MicTapped,
    /// Speech recognition produced a transcript.
    RecognizedText(String),
    /// Speech recognition stopped without producing a transcript.
    ListeningEnded,
}

/// What the assistant is busy with while a turn is awaiting a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Thinking,
    Painting,
}

impl Activity {
    pub fn label(&self) -> &'static str {
        match self {
            Activity::Thinking => "🧠 MiniMi soch raha hai...",
            Activity::Painting => "🎨 MiniMi painting kar raha hai...",
        }
    }
}
