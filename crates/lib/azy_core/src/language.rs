//! Crude language guess used to pick a fallback template.
//!
//! Any non-ASCII character selects Portuguese; a handful of Spanish words
//! select Spanish; everything else is English. The result depends only on
//! the input string.

/// Words that mark a message as Spanish (matched as whole lowercase words).
const SPANISH_MARKERS: &[&str] = &[
    "hola", "gracias", "buenos", "buenas", "usted", "quiero", "ayuda", "estas", "amigo",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Portuguese,
    Spanish,
    English,
}

impl Language {
    /// Guess from the message text.
    pub fn detect(message: &str) -> Self {
        if !message.is_ascii() {
            return Language::Portuguese;
        }
        let lowered = message.to_ascii_lowercase();
        let spanish = lowered
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(|word| SPANISH_MARKERS.contains(&word));
        if spanish {
            Language::Spanish
        } else {
            Language::English
        }
    }

    /// Map a locale hint such as `pt-BR` or `es`; `auto` and unknown hints give `None`.
    pub fn from_hint(hint: &str) -> Option<Self> {
        let primary = hint
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "pt" => Some(Language::Portuguese),
            "es" => Some(Language::Spanish),
            "en" => Some(Language::English),
            _ => None,
        }
    }

    /// Hint first, heuristic otherwise.
    pub fn resolve(hint: &str, message: &str) -> Self {
        Self::from_hint(hint).unwrap_or_else(|| Self::detect(message))
    }
}
