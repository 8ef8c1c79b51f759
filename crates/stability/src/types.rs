use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct TextPrompt {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
}

/// Body of a `text-to-image` call.
#[derive(Debug, Clone, Serialize)]
pub struct TextToImageRequest {
    text_prompts: Vec<TextPrompt>,
    steps: u32,
    width: u32,
    height: u32,
    samples: u32,
    /// How strictly the image follows the prompt; the service default applies when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    cfg_scale: Option<f32>,
}

impl TextToImageRequest {
    pub fn new(prompt: &str) -> Self {
        Self {
            text_prompts: vec![TextPrompt {
                text: prompt.to_string(),
                weight: None,
            }],
            steps: 30,
            width: 1024,
            height: 1024,
            samples: 1,
            cfg_scale: None,
        }
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_cfg_scale(mut self, cfg_scale: f32) -> Self {
        self.cfg_scale = Some(cfg_scale);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    Success,
    ContentFiltered,
    Error,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtifactsResponse {
    pub artifacts: Vec<RawArtifact>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArtifact {
    pub base64: String,
    #[serde(default)]
    pub seed: u64,
    #[serde(rename = "finishReason")]
    pub finish_reason: FinishReason,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub name: Option<String>,
    pub message: String,
}

/// An artifact with its payload decoded to raw image bytes (PNG).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedArtifact {
    pub seed: u64,
    pub finish_reason: FinishReason,
    pub binary: Vec<u8>,
}
