pub mod ingest;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub use ingest::{ingest_json, RawCandidate};

/// WGS84 coordinate pair (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// What kind of item a candidate is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Location,
    Post,
    Event,
}

impl CandidateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateKind::Location => "location",
            CandidateKind::Post => "post",
            CandidateKind::Event => "event",
        }
    }
}

/// Moderation standing of a candidate's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorStatus {
    #[default]
    Active,
    Suspended,
    Banned,
}

impl AuthorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorStatus::Active => "active",
            AuthorStatus::Suspended => "suspended",
            AuthorStatus::Banned => "banned",
        }
    }
}

/// Engagement counters. Missing counts default to zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Engagement {
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub comments: u32,
    #[serde(default)]
    pub saves: u32,
}

/// Moderation signals attached to a candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Moderation {
    #[serde(default)]
    pub report_count: u32,
    #[serde(default)]
    pub author_status: AuthorStatus,
}

/// A single rankable item. Immutable input to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub kind: CandidateKind,
    #[serde(default)]
    pub categories: Vec<String>,
    pub coordinates: Option<Coordinates>,
    /// None when the source record carried no parseable timestamp; the
    /// temporal scorer treats that as neutral, never as fresh.
    pub created_at: Option<DateTime<Utc>>,
    pub author_id: Option<String>,
    #[serde(default)]
    pub engagement: Engagement,
    #[serde(default)]
    pub moderation: Moderation,
    pub text: Option<String>,
}

impl Candidate {
    /// Primary category used for diversity capping.
    pub fn primary_category(&self) -> Option<&str> {
        self.categories.first().map(|c| c.as_str())
    }

    /// Engagement weighted for popularity sorting. Comments count double,
    /// saves half.
    pub fn engagement_weight(&self) -> f32 {
        self.engagement.likes as f32
            + self.engagement.comments as f32 * 2.0
            + self.engagement.saves as f32 * 0.5
    }
}

/// Action recorded in a user's interaction history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionAction {
    View,
    Like,
    Save,
    Share,
}

impl InteractionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionAction::View => "view",
            InteractionAction::Like => "like",
            InteractionAction::Save => "save",
            InteractionAction::Share => "share",
        }
    }
}

/// One entry of a user's interaction history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub item_id: String,
    pub action: InteractionAction,
    pub timestamp: DateTime<Utc>,
}

/// Per-call user profile assembled from caller-supplied signals.
///
/// Built once per ranking invocation and discarded afterwards; the engine
/// never persists it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub interest_categories: Vec<String>,
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub saved_item_ids: HashSet<String>,
    #[serde(default)]
    pub liked_item_ids: HashSet<String>,
    #[serde(default)]
    pub followed_author_ids: HashSet<String>,
    #[serde(default)]
    pub interaction_history: Vec<InteractionEvent>,
}

impl UserProfile {
    /// Profile with no signals at all (unauthenticated callers).
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Whether any prior like/save exists in the interaction history.
    pub fn has_engaged_before(&self) -> bool {
        self.interaction_history
            .iter()
            .any(|e| matches!(e.action, InteractionAction::Like | InteractionAction::Save))
    }
}

/// Per-candidate factor sub-scores plus the composed result.
///
/// `diversity_penalty` and `final_score` are filled in by the selector;
/// until then the penalty is 1.0 and `final_score` equals `composed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub interest: f32,
    pub geo: f32,
    pub temporal: f32,
    pub popularity: f32,
    pub behavioral: f32,
    pub composed: f32,
    pub diversity_penalty: f32,
    pub final_score: f32,
}

impl ScoreBreakdown {
    /// Breakdown for items that bypassed scoring (simple-sort feed modes).
    pub fn unscored() -> Self {
        Self {
            interest: 0.0,
            geo: 0.0,
            temporal: 0.0,
            popularity: 0.0,
            behavioral: 0.0,
            composed: 0.0,
            diversity_penalty: 1.0,
            final_score: 0.0,
        }
    }
}

/// One entry of the final ranked output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedItem {
    pub candidate: Candidate,
    pub breakdown: ScoreBreakdown,
    pub match_reasons: Vec<String>,
}

/// Pipeline counters returned alongside the ranked items.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RankingStats {
    pub input_count: usize,
    pub filtered_count: usize,
    pub scored_count: usize,
    pub final_count: usize,
}

/// Ordered, diversified ranking output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankedResult {
    pub items: Vec<RankedItem>,
    pub stats: RankingStats,
}

impl RankedResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// How a feed request wants its candidates ordered.
///
/// Only `Recommended` routes through the scoring pipeline; the other modes
/// are plain sorts over the safety-filtered pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedMode {
    Recommended,
    Latest,
    Popular,
    Following,
}

impl FeedMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedMode::Recommended => "recommended",
            FeedMode::Latest => "latest",
            FeedMode::Popular => "popular",
            FeedMode::Following => "following",
        }
    }
}
