mod client;
pub mod types;

pub use client::{Client, Config, ConfigBuilder, StabilityError};
pub use types::{DecodedArtifact, FinishReason, TextPrompt, TextToImageRequest};
