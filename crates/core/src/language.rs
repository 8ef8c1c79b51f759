use serde::Serialize;
use std::fmt;

const HINDI_MARKERS: [&str; 4] = ["hai", "hoon", "aap", "kaise"];
const BENGALI_MARKERS: [&str; 4] = ["ami", "tumi", "bhalo", "kemon"];

/// Speech-synthesis locale for a reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "hi-IN")]
    HiIn,
    #[serde(rename = "bn-IN")]
    BnIn,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::HiIn => "hi-IN",
            Locale::BnIn => "bn-IN",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks a locale by looking for marker words in the text.
///
/// Hindi markers win over Bengali ones; with neither present the reply is
/// spoken as English. Markers are plain substrings of the lower-cased text.
pub fn detect_locale(text: &str) -> Locale {
    let lower = text.to_lowercase();
    if HINDI_MARKERS.iter().any(|w| lower.contains(w)) {
        Locale::HiIn
    } else if BENGALI_MARKERS.iter().any(|w| lower.contains(w)) {
        Locale::BnIn
    } else {
        Locale::EnUs
    }
}

/// Flattens a reply into a single line for speech synthesis.
pub fn speakable(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_is_the_default() {
        assert_eq!(detect_locale("I am fine, thanks"), Locale::EnUs);
        assert_eq!(detect_locale(""), Locale::EnUs);
    }

    #[test]
    fn test_hindi_markers() {
        assert_eq!(detect_locale("Main theek hoon"), Locale::HiIn);
        assert_eq!(detect_locale("Aap kaise ho?"), Locale::HiIn);
    }

    #[test]
    fn test_bengali_markers() {
        assert_eq!(detect_locale("Ami bhalo achi"), Locale::BnIn);
        assert_eq!(detect_locale("Tumi kemon acho?"), Locale::BnIn);
    }

    #[test]
    fn test_hindi_takes_priority_over_bengali() {
        assert_eq!(detect_locale("Ami bhalo, aap kaise ho?"), Locale::HiIn);
    }

    #[test]
    fn test_locale_tags() {
        assert_eq!(Locale::HiIn.to_string(), "hi-IN");
        assert_eq!(serde_json::to_value(Locale::BnIn).unwrap(), "bn-IN");
    }

    #[test]
    fn test_speakable_joins_lines() {
        assert_eq!(speakable("one\ntwo\r\nthree"), "one two three");
        assert_eq!(speakable("it's fine"), "it's fine");
    }
}
