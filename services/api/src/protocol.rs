//! JSON frames exchanged with the chat page over the WebSocket.

use crate::render::markdown_to_html;
use minimi_core::error::{FailureKind, TurnError};
use minimi_core::image::IMAGE_CAPTION;
use minimi_core::language::Locale;
use minimi_core::transcript::{Message, MessageKind, Role};
use minimi_core::{Activity, BridgeEvent, Command};
use serde::{Deserialize, Serialize};

/// Frames sent by the browser.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Submit { text: String },
    MicTapped,
    RecognizedText { text: String },
    ListeningEnded,
}

impl From<ClientMessage> for BridgeEvent {
    fn from(msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::Submit { text } => BridgeEvent::Submit(text),
            ClientMessage::MicTapped => BridgeEvent::MicTapped,
            ClientMessage::RecognizedText { text } => BridgeEvent::RecognizedText(text),
            ClientMessage::ListeningEnded => BridgeEvent::ListeningEnded,
        }
    }
}

/// Frames sent to the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    StartListening,
    FillInput {
        text: String,
    },
    Pending {
        activity: Activity,
        label: &'static str,
    },
    Message {
        role: Role,
        kind: MessageKind,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        html: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<&'static str>,
    },
    Speak {
        text: String,
        locale: Locale,
    },
    Error {
        kind: &'static str,
        message: String,
    },
}

impl ServerMessage {
    pub fn error(err: &TurnError) -> Self {
        let kind = match err.kind() {
            FailureKind::Configuration => "configuration",
            FailureKind::Service => "service",
        };
        ServerMessage::Error {
            kind,
            message: err.to_string(),
        }
    }

    fn message(message: Message) -> Self {
        let (html, caption) = if message.is_image() {
            (None, Some(IMAGE_CAPTION))
        } else {
            (Some(markdown_to_html(message.content())), None)
        };
        ServerMessage::Message {
            role: message.role(),
            kind: message.kind(),
            content: message.content().to_string(),
            html,
            caption,
        }
    }
}

impl From<Command> for ServerMessage {
    fn from(command: Command) -> Self {
        match command {
            Command::StartListening => ServerMessage::StartListening,
            Command::FillInput(text) => ServerMessage::FillInput { text },
            Command::Pending(activity) => ServerMessage::Pending {
                activity,
                label: activity.label(),
            },
            Command::Show(message) => ServerMessage::message(message),
            Command::Speak { text, locale } => ServerMessage::Speak { text, locale },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_frames_parse() {
        let submit: ClientMessage =
            serde_json::from_str(r#"{"type":"submit","text":"hello"}"#).unwrap();
        assert_eq!(
            BridgeEvent::from(submit),
            BridgeEvent::Submit("hello".to_string())
        );

        let tap: ClientMessage = serde_json::from_str(r#"{"type":"mic_tapped"}"#).unwrap();
        assert_eq!(BridgeEvent::from(tap), BridgeEvent::MicTapped);

        let heard: ClientMessage =
            serde_json::from_str(r#"{"type":"recognized_text","text":"namaste"}"#).unwrap();
        assert_eq!(
            BridgeEvent::from(heard),
            BridgeEvent::RecognizedText("namaste".to_string())
        );

        let ended: ClientMessage =
            serde_json::from_str(r#"{"type":"listening_ended"}"#).unwrap();
        assert_eq!(BridgeEvent::from(ended), BridgeEvent::ListeningEnded);
    }

    #[test]
    fn test_unknown_client_frame_is_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"reset"}"#).is_err());
    }

    #[test]
    fn test_speak_frame() {
        let frame = ServerMessage::from(Command::Speak {
            text: "Maine aapki tasveer bana di hai".to_string(),
            locale: Locale::HiIn,
        });
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({"type": "speak", "text": "Maine aapki tasveer bana di hai", "locale": "hi-IN"})
        );
    }

    #[test]
    fn test_text_message_carries_html() {
        let frame = ServerMessage::from(Command::Show(Message::assistant("*hi*")));
        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(value["type"], "message");
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["kind"], "text");
        assert_eq!(value["html"], "<p><em>hi</em></p>\n");
        assert!(value.get("caption").is_none());
    }

    #[test]
    fn test_image_message_carries_caption() {
        let frame = ServerMessage::from(Command::Show(Message::image("data:image/png;base64,AA==")));
        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(value["kind"], "image");
        assert_eq!(value["content"], "data:image/png;base64,AA==");
        assert_eq!(value["caption"], "Result by MiniMi");
        assert!(value.get("html").is_none());
    }

    #[test]
    fn test_pending_and_error_frames() {
        let frame = ServerMessage::from(Command::Pending(Activity::Painting));
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({"type": "pending", "activity": "painting", "label": "🎨 MiniMi painting kar raha hai..."})
        );

        let frame = ServerMessage::error(&TurnError::MissingCredential {
            var: "STABILITY_API_KEY",
        });
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({
                "type": "error",
                "kind": "configuration",
                "message": "API Key missing! Please add STABILITY_API_KEY in Secrets."
            })
        );
    }
}
