//! Content policy — a fixed denylist of identity terms.
//!
//! Matching is a case-insensitive substring test on the whole message. No
//! tokenization, no stemming: `"rihannas"` and `"celebrityish"` are blocked too.

/// Terms that always block a request.
pub const DEFAULT_BLOCKED_TERMS: &[&str] = &[
    "imitate",
    "impersonate",
    "celebrity",
    "donald trump",
    "rihanna",
    "michael jackson",
];

/// Result of checking one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyVerdict {
    pub blocked: bool,
    /// The first denylisted term found, when blocked.
    pub matched: Option<String>,
}

impl PolicyVerdict {
    fn allowed() -> Self {
        Self {
            blocked: false,
            matched: None,
        }
    }
}

/// Lowercased denylist.
#[derive(Debug, Clone)]
pub struct Denylist {
    terms: Vec<String>,
}

impl Default for Denylist {
    fn default() -> Self {
        Self::with_extra_terms(std::iter::empty::<&str>())
    }
}

impl Denylist {
    /// Default terms followed by `extra` (blank entries are ignored).
    pub fn with_extra_terms<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: Vec<String> = DEFAULT_BLOCKED_TERMS.iter().map(|t| t.to_string()).collect();
        for term in extra {
            let term = term.as_ref().trim().to_lowercase();
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn check(&self, message: &str) -> PolicyVerdict {
        if message.is_empty() {
            return PolicyVerdict::allowed();
        }
        let lowered = message.to_lowercase();
        match self.terms.iter().find(|t| lowered.contains(t.as_str())) {
            Some(term) => PolicyVerdict {
                blocked: true,
                matched: Some(term.clone()),
            },
            None => PolicyVerdict::allowed(),
        }
    }
}
