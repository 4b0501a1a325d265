//! Realtime (WebSocket) configuration

use serde::Deserialize;

use crate::domain::chat::ModerationFilter;

use super::error::ValidationError;

/// Realtime fan-out and moderation settings
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    /// Bounded outbound queue size per connection
    #[serde(default = "default_outbox_capacity")]
    pub outbox_capacity: usize,

    /// Extra blocked words (comma-separated), appended to the built-in list
    pub extra_blocked_words: Option<String>,
}

impl RealtimeConfig {
    /// Get extra blocked words as a vector
    pub fn extra_blocked_words_list(&self) -> Vec<String> {
        self.extra_blocked_words
            .as_ref()
            .map(|s| {
                s.split(',')
                    .map(|w| w.trim().to_string())
                    .filter(|w| !w.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Build the moderation filter with the configured extra words.
    pub fn moderation_filter(&self) -> Result<ModerationFilter, ValidationError> {
        ModerationFilter::with_extra_words(self.extra_blocked_words_list())
            .map_err(|e| ValidationError::InvalidBlockedWord(e.to_string()))
    }

    /// Validate realtime configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.outbox_capacity == 0 {
            return Err(ValidationError::InvalidOutboxCapacity);
        }
        self.moderation_filter()?;
        Ok(())
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            outbox_capacity: default_outbox_capacity(),
            extra_blocked_words: None,
        }
    }
}

fn default_outbox_capacity() -> usize {
    256
}
