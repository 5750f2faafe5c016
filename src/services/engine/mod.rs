//! Ranking engine façade.
//!
//! Orchestrates the pipeline: safety filter → factor scoring → composition →
//! diversified selection. Holds no state between invocations; every call is a
//! self-contained synchronous batch computation, safe to run concurrently
//! from any number of callers.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::config::RankingConfig;
use crate::models::{
    Candidate, FeedMode, RankedItem, RankedResult, RankingStats, ScoreBreakdown, UserProfile,
};
use crate::services::diversity::DiversifiedSelector;
use crate::services::safety::SafetyFilter;
use crate::services::scoring::ScoreComposer;

#[derive(Debug, Error)]
pub enum RankingError {
    /// The only caller-visible failure: everything else degrades to neutral
    /// scores or an empty result.
    #[error("limit must be greater than zero")]
    InvalidLimit,
}

pub type Result<T> = std::result::Result<T, RankingError>;

pub struct RankingEngine {
    safety: SafetyFilter,
    composer: ScoreComposer,
    selector: DiversifiedSelector,
}

impl RankingEngine {
    pub fn new(config: RankingConfig) -> Self {
        let safety = SafetyFilter::new(&config);
        let selector = DiversifiedSelector::new(&config);
        let composer = ScoreComposer::new(config);
        Self {
            safety,
            composer,
            selector,
        }
    }

    /// Rank candidates for a profile.
    ///
    /// `now` is injected so temporal scoring is deterministic under test.
    /// `profile: None` is the anonymous path: a popularity/recency ordering
    /// with the interest and behavioral scorers skipped. Empty candidates
    /// yield an empty result, not an error.
    pub fn rank(
        &self,
        candidates: Vec<Candidate>,
        profile: Option<&UserProfile>,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<RankedResult> {
        if limit == 0 {
            return Err(RankingError::InvalidLimit);
        }

        let input_count = candidates.len();
        if input_count == 0 {
            return Ok(RankedResult::empty());
        }

        let (surviving, safety_stats) = self.safety.filter(candidates);
        let scored_count = surviving.len();

        let scored = self.composer.score_all(surviving, profile, now);
        let items = self.selector.select(scored, limit);

        let stats = RankingStats {
            input_count,
            filtered_count: safety_stats.filtered,
            scored_count,
            final_count: items.len(),
        };

        info!(
            input_count = stats.input_count,
            filtered = stats.filtered_count,
            final_count = stats.final_count,
            limit = limit,
            "Ranking completed"
        );

        Ok(RankedResult {
            items,
            stats,
        })
    }

    /// Dispatch a feed request by mode.
    ///
    /// Only `Recommended` runs the scoring pipeline. The other modes are
    /// plain sorts over the safety-filtered pool and must stay that way.
    pub fn rank_feed(
        &self,
        mode: FeedMode,
        candidates: Vec<Candidate>,
        profile: Option<&UserProfile>,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<RankedResult> {
        if mode == FeedMode::Recommended {
            return self.rank(candidates, profile, limit, now);
        }

        if limit == 0 {
            return Err(RankingError::InvalidLimit);
        }

        let input_count = candidates.len();
        let (mut surviving, safety_stats) = self.safety.filter(candidates);
        let scored_count = surviving.len();

        match mode {
            FeedMode::Latest => {
                // Unknown timestamps (None) sort last
                surviving.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
            FeedMode::Popular => {
                surviving.sort_by(|a, b| {
                    b.engagement_weight()
                        .partial_cmp(&a.engagement_weight())
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            }
            FeedMode::Following => {
                let followed = profile.map(|p| &p.followed_author_ids);
                surviving.retain(|c| match (&c.author_id, followed) {
                    (Some(author), Some(followed)) => followed.contains(author),
                    _ => false,
                });
                surviving.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
            FeedMode::Recommended => unreachable!("handled above"),
        }

        surviving.truncate(limit);

        let items: Vec<RankedItem> = surviving
            .into_iter()
            .map(|candidate| RankedItem {
                candidate,
                breakdown: ScoreBreakdown::unscored(),
                match_reasons: Vec::new(),
            })
            .collect();

        let stats = RankingStats {
            input_count,
            filtered_count: safety_stats.filtered,
            scored_count,
            final_count: items.len(),
        };

        info!(
            mode = mode.as_str(),
            final_count = stats.final_count,
            "Simple-sort feed completed"
        );

        Ok(RankedResult {
            items,
            stats,
        })
    }
}
