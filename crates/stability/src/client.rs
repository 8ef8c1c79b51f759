use crate::types::{ArtifactsResponse, DecodedArtifact, ErrorBody, TextToImageRequest};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::ExposeSecret;

mod config;
mod consts;

pub use config::{Config, ConfigBuilder};

#[derive(Debug, thiserror::Error)]
pub enum StabilityError {
    #[error("request to image service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("image service returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("could not decode artifact: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// REST client for the text-to-image endpoint.
pub struct Client {
    http: reqwest::Client,
    config: Config,
}

impl Client {
    pub fn new(config: Config) -> Self {
        Self::with_http(reqwest::Client::new(), config)
    }

    /// Reuses an existing connection pool.
    pub fn with_http(http: reqwest::Client, config: Config) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn text_to_image(
        &self,
        request: &TextToImageRequest,
    ) -> Result<Vec<DecodedArtifact>, StabilityError> {
        let url = self.config.text_to_image_url();
        tracing::debug!(engine = self.config.engine(), "requesting text-to-image");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.config.api_key().expose_secret())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(StabilityError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let body = resp.json::<ArtifactsResponse>().await?;
        decode_artifacts(body)
    }
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => match err.name {
            Some(name) => format!("{name}: {}", err.message),
            None => err.message,
        },
        Err(_) if body.trim().is_empty() => "no error details".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

fn decode_artifacts(body: ArtifactsResponse) -> Result<Vec<DecodedArtifact>, StabilityError> {
    body.artifacts
        .into_iter()
        .map(|raw| {
            Ok(DecodedArtifact {
                seed: raw.seed,
                finish_reason: raw.finish_reason,
                binary: STANDARD.decode(raw.base64.as_bytes())?,
            })
        })
        .collect()
}
