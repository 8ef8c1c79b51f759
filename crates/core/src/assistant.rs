use crate::Activity;
use crate::Command;
use crate::chat::{ChatCompletion, build_chat_request};
use crate::classifier::{RequestKind, classify};
use crate::error::TurnError;
use crate::image::{
    CONFIRMATION_PHRASE, GenerationParams, ImageGenerator, image_artifacts, to_data_url,
};
use crate::language::{Locale, detect_locale, speakable};
use crate::transcript::{Message, Transcript};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::mpsc::Sender;

/// Name of the environment variable holding the image credential.
pub const IMAGE_API_KEY_VAR: &str = "STABILITY_API_KEY";

/// What a successful turn did to the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnSummary {
    pub kind: RequestKind,
    /// Number of messages appended, including the user's own.
    pub appended: usize,
    /// Locale the reply was spoken with.
    pub locale: Locale,
}

/// Runs one user turn against the external services.
///
/// The assistant holds no conversation state. The caller passes the
/// transcript in, and it is only touched once a service call has succeeded,
/// so a failed turn leaves it exactly as it was.
pub struct Assistant {
    chat: Arc<dyn ChatCompletion>,
    images: Arc<dyn ImageGenerator>,
    image_api_key: Option<SecretString>,
    params: GenerationParams,
}

impl Assistant {
    pub fn new(
        chat: Arc<dyn ChatCompletion>,
        images: Arc<dyn ImageGenerator>,
        image_api_key: Option<SecretString>,
    ) -> Self {
        Self {
            chat,
            images,
            image_api_key,
            params: GenerationParams::default(),
        }
    }

    pub fn has_image_credential(&self) -> bool {
        self.image_api_key.is_some()
    }

    pub async fn handle_utterance(
        &self,
        transcript: &mut Transcript,
        utterance: &str,
        command_tx: &Sender<Command>,
    ) -> Result<TurnSummary, TurnError> {
        let kind = classify(utterance);
        tracing::info!(?kind, "handling utterance");

        let result = match kind {
            RequestKind::Image => self.handle_image(transcript, utterance, command_tx).await,
            RequestKind::Chat => self.handle_chat(transcript, utterance, command_tx).await,
        };

        match &result {
            Ok(summary) => tracing::info!(
                ?kind,
                appended = summary.appended,
                locale = %summary.locale,
                "turn complete"
            ),
            Err(e) => tracing::error!(?kind, error = ?e, "turn failed"),
        }
        result
    }

    async fn handle_image(
        &self,
        transcript: &mut Transcript,
        utterance: &str,
        command_tx: &Sender<Command>,
    ) -> Result<TurnSummary, TurnError> {
        let api_key = self
            .image_api_key
            .as_ref()
            .ok_or(TurnError::MissingCredential {
                var: IMAGE_API_KEY_VAR,
            })?;

        emit(command_tx, Command::Pending(Activity::Painting)).await;

        let artifacts = self
            .images
            .generate(api_key.expose_secret(), utterance, &self.params)
            .await
            .map_err(TurnError::ImageService)?;

        let images: Vec<Message> = image_artifacts(&artifacts)
            .map(|artifact| Message::image(to_data_url(artifact)))
            .collect();
        if images.is_empty() {
            return Err(TurnError::NoImage);
        }
        tracing::debug!(
            returned = artifacts.len(),
            images = images.len(),
            "image generation finished"
        );

        transcript.append(Message::user(utterance));
        let appended = images.len() + 1;
        for image in images {
            transcript.append(image.clone());
            emit(command_tx, Command::Show(image)).await;
        }

        emit(
            command_tx,
            Command::Speak {
                text: CONFIRMATION_PHRASE.to_string(),
                locale: Locale::HiIn,
            },
        )
        .await;

        Ok(TurnSummary {
            kind: RequestKind::Image,
            appended,
            locale: Locale::HiIn,
        })
    }

    async fn handle_chat(
        &self,
        transcript: &mut Transcript,
        utterance: &str,
        command_tx: &Sender<Command>,
    ) -> Result<TurnSummary, TurnError> {
        emit(command_tx, Command::Pending(Activity::Thinking)).await;

        let request = build_chat_request(transcript, utterance);
        let reply = self
            .chat
            .complete(&request)
            .await
            .map_err(TurnError::ChatService)?;

        let locale = detect_locale(&reply);
        let message = Message::assistant(reply.as_str());

        transcript.append(Message::user(utterance));
        transcript.append(message.clone());

        emit(command_tx, Command::Show(message)).await;
        emit(
            command_tx,
            Command::Speak {
                text: speakable(&reply),
                locale,
            },
        )
        .await;

        Ok(TurnSummary {
            kind: RequestKind::Chat,
            appended: 2,
            locale,
        })
    }
}

/// Sends a command to the bridge. A closed receiver means the browser went
/// away; that never fails the turn.
pub(crate) async fn emit(command_tx: &Sender<Command>, command: Command) {
    if let Err(e) = command_tx.send(command).await {
        tracing::warn!("Bridge closed, dropping command: {:?}", e.0);
    }
}
