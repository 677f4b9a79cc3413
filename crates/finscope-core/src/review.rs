//! # Review Module
//!
//! Star-rating reviews left on the results page.

use crate::primitives::{MAX_FEEDBACK_LENGTH, MAX_RATING};
use crate::{FinscopeError, RespondentId};
use serde::{Deserialize, Serialize};

/// Quick reaction picked alongside the rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reaction {
    #[serde(rename = "Great")]
    Great,
    #[serde(rename = "Loved it")]
    LovedIt,
    #[serde(rename = "Excellent")]
    Excellent,
    #[serde(rename = "Amazing")]
    Amazing,
}

impl Reaction {
    pub const ALL: [Reaction; 4] = [
        Reaction::Great,
        Reaction::LovedIt,
        Reaction::Excellent,
        Reaction::Amazing,
    ];

    /// Label shown on the reaction button.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Reaction::Great => "Great",
            Reaction::LovedIt => "Loved it",
            Reaction::Excellent => "Excellent",
            Reaction::Amazing => "Amazing",
        }
    }

    /// Parse a reaction from its button label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Reaction> {
        Reaction::ALL.into_iter().find(|r| r.label() == label)
    }

    /// Emoji fired when the reaction is submitted.
    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            Reaction::Great => "😊",
            Reaction::LovedIt => "❤️",
            Reaction::Excellent => "🔥",
            Reaction::Amazing => "⚡",
        }
    }
}

impl std::fmt::Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}

/// A review as submitted, before it is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub respondent_id: RespondentId,
    /// Star rating; 0 means "not rated".
    pub rating: u8,
    #[serde(default)]
    pub reaction: Option<Reaction>,
    #[serde(default)]
    pub feedback: String,
}

impl ReviewDraft {
    /// Validate rating range and message length.
    pub fn validate(&self) -> Result<(), FinscopeError> {
        if self.rating == 0 {
            return Err(FinscopeError::RatingRequired);
        }
        if self.rating > MAX_RATING {
            return Err(FinscopeError::InvalidRating(self.rating));
        }
        if self.feedback.len() > MAX_FEEDBACK_LENGTH {
            return Err(FinscopeError::FieldTooLong {
                field: "feedback",
                max: MAX_FEEDBACK_LENGTH,
            });
        }
        Ok(())
    }
}
