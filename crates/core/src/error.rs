/// Broad category of a failed turn, for callers that do not care about the
/// specific variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Something the operator has to fix; retrying will not help.
    Configuration,
    /// An external service failed; the user may submit again.
    Service,
}

/// Why a single turn produced no transcript change.
///
/// The `Display` text is what the user sees.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("API Key missing! Please add {var} in Secrets.")]
    MissingCredential { var: &'static str },
    #[error("Error: {0}")]
    ImageService(#[source] anyhow::Error),
    #[error("Error: the image service returned no image")]
    NoImage,
    #[error("Service busy hai, please thodi der baad try karein.")]
    ChatService(#[source] anyhow::Error),
}

impl TurnError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TurnError::MissingCredential { .. } => FailureKind::Configuration,
            TurnError::ImageService(_) | TurnError::NoImage | TurnError::ChatService(_) => {
                FailureKind::Service
            }
        }
    }
}
