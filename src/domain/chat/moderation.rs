//! Content moderation for chat text.
//!
//! Pure keyword filter: case-insensitive whole-word match against a
//! blocked list, tolerating common inflections ("-s", "-ing", "-ed", ...).
//! Runs before persistence on every chat message.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Words blocked out of the box. Deployments may append more via config.
pub const DEFAULT_BLOCKED_WORDS: &[&str] = &[
    "fuck",
    "shit",
    "bitch",
    "bastard",
    "asshole",
    "cunt",
    "dick",
    "slut",
    "whore",
    "motherfucker",
    "retard",
    "idiot",
    "stupid",
];

/// Message surfaced to the sender when a chat message is flagged.
pub const FLAGGED_MESSAGE: &str = "Message contains inappropriate language";

static DEFAULT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let words: Vec<String> = DEFAULT_BLOCKED_WORDS.iter().map(|w| w.to_string()).collect();
    // Escaped alternation of literals always compiles.
    compile(&words).expect("default moderation pattern compiles")
});

fn compile(words: &[String]) -> Result<Regex, regex::Error> {
    let alternation = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&format!(r"\b(?:{})(?:s|es|ed|er|ers|ing)?\b", alternation))
        .case_insensitive(true)
        .build()
}

/// Stateless text classifier: flagged or clean.
#[derive(Debug, Clone)]
pub struct ModerationFilter {
    pattern: Regex,
}

impl ModerationFilter {
    /// Filter over [`DEFAULT_BLOCKED_WORDS`].
    pub fn new() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.clone(),
        }
    }

    /// Filter over the default list plus deployment-specific words.
    pub fn with_extra_words<I, S>(extra: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = DEFAULT_BLOCKED_WORDS.iter().map(|w| w.to_string()).collect();
        words.extend(extra.into_iter().map(|w| w.as_ref().to_lowercase()));
        Ok(Self {
            pattern: compile(&words)?,
        })
    }

    /// Returns true when the text violates the content policy.
    pub fn is_flagged(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

impl Default for ModerationFilter {
    fn default() -> Self {
        Self::new()
    }
}
