use anyhow::Result;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
#[cfg(test)]
use mockall::automock;

/// Spoken after an image has been added to the transcript.
pub const CONFIRMATION_PHRASE: &str = "Maine aapki tasveer bana di hai";
/// Caption rendered under generated images.
pub const IMAGE_CAPTION: &str = "Result by MiniMi";

const DEFAULT_MIME: &str = "image/png";

/// Fixed generation settings: one square sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParams {
    pub samples: u32,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            samples: 1,
            width: 1024,
            height: 1024,
            steps: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Image,
    Text,
    Other,
}

/// One typed output of an image-generation call, with its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub mime: Option<String>,
    pub binary: Vec<u8>,
}

impl Artifact {
    pub fn image(binary: Vec<u8>) -> Self {
        Self {
            kind: ArtifactKind::Image,
            mime: Some(DEFAULT_MIME.to_string()),
            binary,
        }
    }
}

/// Any backend that generates images from a text prompt.
///
/// The credential is passed per call; the caller owns the decision of
/// whether one is configured at all.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Vec<Artifact>>;
}

pub fn image_artifacts(artifacts: &[Artifact]) -> impl Iterator<Item = &Artifact> {
    artifacts.iter().filter(|a| a.kind == ArtifactKind::Image)
}

/// Encodes an artifact as an inline `data:` URL.
pub fn to_data_url(artifact: &Artifact) -> String {
    let mime = artifact.mime.as_deref().unwrap_or(DEFAULT_MIME);
    format!("data:{mime};base64,{}", STANDARD.encode(&artifact.binary))
}
