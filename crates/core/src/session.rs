use crate::assistant::{Assistant, emit};
use crate::error::TurnError;
use crate::transcript::Transcript;
use crate::{BridgeEvent, Command};
use tokio::sync::mpsc::Sender;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MicState {
    #[default]
    Idle,
    Listening,
}

/// State owned by one browser session.
///
/// Every connection gets its own `ChatSession`; it is never shared and goes
/// away with the connection.
#[derive(Debug, Default)]
pub struct ChatSession {
    pub transcript: Transcript,
    pub mic: MicState,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one inbound bridge event.
    ///
    /// Mic events only move the microphone state and emit intents. A submit
    /// runs a full turn; its error is returned for the runtime to display.
    pub async fn handle_event(
        &mut self,
        assistant: &Assistant,
        event: BridgeEvent,
        command_tx: &Sender<Command>,
    ) -> Result<(), TurnError> {
        match event {
            BridgeEvent::MicTapped => {
                if self.mic == MicState::Listening {
                    tracing::debug!("mic tapped while listening, restarting recognition");
                }
                self.mic = MicState::Listening;
                emit(command_tx, Command::StartListening).await;
            }
            BridgeEvent::RecognizedText(text) => {
                if self.mic == MicState::Idle {
                    tracing::debug!("recognized text arrived without a pending mic tap");
                }
                self.mic = MicState::Idle;
                emit(command_tx, Command::FillInput(text)).await;
            }
            BridgeEvent::ListeningEnded => {
                self.mic = MicState::Idle;
            }
            BridgeEvent::Submit(text) => {
                let text = text.trim();
                if text.is_empty() {
                    tracing::debug!("ignoring blank submit");
                    return Ok(());
                }
                assistant
                    .handle_utterance(&mut self.transcript, text, command_tx)
                    .await?;
            }
        }
        Ok(())
    }
}
