/// Phrases that turn an utterance into an image request. Matched against the
/// lower-cased input, anywhere in the text.
pub const IMAGE_KEYWORDS: [&str; 5] = [
    "create image",
    "generate image",
    "photo banao",
    "tasveer banao",
    "chobi banao",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Image,
    Chat,
}

pub fn is_image_request(utterance: &str) -> bool {
    let lower = utterance.to_lowercase();
    IMAGE_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

pub fn classify(utterance: &str) -> RequestKind {
    if is_image_request(utterance) {
        RequestKind::Image
    } else {
        RequestKind::Chat
    }
}
