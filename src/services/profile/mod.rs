//! Profile builder.
//!
//! Assembles a per-call [`UserProfile`] from the raw signals the caller
//! fetched from its read paths. Absence of a signal maps to an empty
//! collection, never an error.

use crate::models::{Coordinates, InteractionEvent, UserProfile};
use serde::Deserialize;
use tracing::debug;

/// Raw signals supplied by the caller, straight off its read paths.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileSignals {
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub saved_item_ids: Vec<String>,
    #[serde(default)]
    pub liked_item_ids: Vec<String>,
    #[serde(default)]
    pub followed_author_ids: Vec<String>,
    #[serde(default)]
    pub interaction_history: Vec<InteractionEvent>,
}

pub struct ProfileBuilder;

impl Default for ProfileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build a profile from raw signals. Interest labels are trimmed and
    /// deduplicated case-insensitively; empty labels are dropped.
    pub fn build(&self, signals: ProfileSignals) -> UserProfile {
        let mut seen = std::collections::HashSet::new();
        let interest_categories: Vec<String> = signals
            .interests
            .into_iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .filter(|i| seen.insert(i.to_lowercase()))
            .collect();

        let profile = UserProfile {
            interest_categories,
            coordinates: signals.coordinates,
            saved_item_ids: signals.saved_item_ids.into_iter().collect(),
            liked_item_ids: signals.liked_item_ids.into_iter().collect(),
            followed_author_ids: signals.followed_author_ids.into_iter().collect(),
            interaction_history: signals.interaction_history,
        };

        debug!(
            interests = profile.interest_categories.len(),
            saved = profile.saved_item_ids.len(),
            liked = profile.liked_item_ids.len(),
            followed = profile.followed_author_ids.len(),
            history = profile.interaction_history.len(),
            "Profile built"
        );

        profile
    }
}
