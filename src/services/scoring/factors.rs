//! Factor scorers.
//!
//! One pure function per scoring dimension. Each returns a normalized
//! sub-score plus zero or more human-readable match reasons, and each
//! degrades to a neutral score on missing data instead of failing.

use chrono::{DateTime, Timelike, Utc};
use tracing::debug;

use crate::config::{GeoDecayPolicy, RankingConfig};
use crate::models::{Candidate, UserProfile};
use crate::utils::{exponential_decay, haversine_km};

/// Neutral interest score when the profile declares no interests.
pub const NEUTRAL_INTEREST: f32 = 0.5;
/// Neutral geo score when either side lacks coordinates. Absence of location
/// data must not zero out a candidate.
pub const NEUTRAL_GEO: f32 = 1.0;

/// Result of a single factor scorer.
#[derive(Debug, Clone)]
pub struct FactorScore {
    pub score: f32,
    pub reasons: Vec<String>,
}

impl FactorScore {
    fn neutral(score: f32) -> Self {
        Self {
            score,
            reasons: Vec::new(),
        }
    }
}

/// Fraction of the profile's interests found among the candidate's
/// categories (case-insensitive, substring-tolerant in both directions, so
/// "coffee" matches "coffee shop").
pub fn interest_match(candidate: &Candidate, profile: &UserProfile) -> FactorScore {
    if profile.interest_categories.is_empty() {
        return FactorScore::neutral(NEUTRAL_INTEREST);
    }

    let categories: Vec<String> = candidate
        .categories
        .iter()
        .map(|c| c.to_lowercase())
        .collect();

    let matched: Vec<&str> = profile
        .interest_categories
        .iter()
        .filter(|interest| {
            let interest = interest.to_lowercase();
            categories
                .iter()
                .any(|cat| cat.contains(&interest) || interest.contains(cat.as_str()))
        })
        .map(|s| s.as_str())
        .collect();

    let score = matched.len() as f32 / profile.interest_categories.len() as f32;

    let reasons = if matched.is_empty() {
        Vec::new()
    } else {
        vec![format!("matches your interests: {}", matched.join(", "))]
    };

    FactorScore { score, reasons }
}

/// Distance decay between the profile and the candidate.
///
/// Neutral when either side has no coordinates or the distance comes back
/// NaN. Otherwise applies the configured decay policy: exponential for
/// feed-style ranking, hard-cutoff-plus-linear for explorer-style.
pub fn geo_relevance(
    candidate: &Candidate,
    profile: &UserProfile,
    config: &RankingConfig,
) -> FactorScore {
    let (user, place) = match (profile.coordinates, candidate.coordinates) {
        (Some(u), Some(p)) => (u, p),
        _ => return FactorScore::neutral(NEUTRAL_GEO),
    };

    let distance_km = haversine_km(user, place);
    if distance_km.is_nan() {
        return FactorScore::neutral(NEUTRAL_GEO);
    }

    let score = match config.geo_policy {
        GeoDecayPolicy::Exponential => {
            exponential_decay(distance_km, config.decay_radius_km) as f32
        }
        GeoDecayPolicy::RadiusLinear => {
            if distance_km > config.travel_radius_km {
                0.0
            } else {
                (1.0 - distance_km / config.travel_radius_km) as f32
            }
        }
    };

    let mut reasons = Vec::new();
    if distance_km < 1.0 {
        reasons.push("very close".to_string());
    } else if distance_km < 3.0 {
        reasons.push("nearby".to_string());
    }

    debug!(
        candidate_id = %candidate.id,
        distance_km = distance_km,
        score = score,
        "Geo relevance computed"
    );

    FactorScore { score, reasons }
}

const MEAL_BANDS: &[(u32, u32, &str)] = &[
    (6, 11, "breakfast"),
    (11, 15, "lunch"),
    (17, 22, "dinner"),
];

/// Recency multiplier plus a meal-time boost.
///
/// Fresh content is boosted in bands (×1.3 under an hour, ×1.2 under six,
/// ×1.1 under a day), week-old content is penalized ×0.8. A candidate with
/// an unknown timestamp gets the neutral ×1.0 multiplier: no boost, no
/// penalty. If the injected now falls in a meal band and the candidate
/// mentions the meal keyword, an additional ×1.1 applies. Boosts multiply.
pub fn temporal_relevance(candidate: &Candidate, now: DateTime<Utc>) -> FactorScore {
    let recency = match candidate.created_at {
        Some(created_at) => {
            let age_hours = (now - created_at).num_minutes().max(0) as f32 / 60.0;
            if age_hours < 1.0 {
                1.3
            } else if age_hours < 6.0 {
                1.2
            } else if age_hours < 24.0 {
                1.1
            } else if age_hours > 168.0 {
                0.8
            } else {
                1.0
            }
        }
        None => 1.0,
    };

    let hour = now.hour();
    let meal = MEAL_BANDS
        .iter()
        .find(|(start, end, _)| hour >= *start && hour < *end)
        .filter(|(_, _, keyword)| mentions_keyword(candidate, keyword))
        .map(|_| 1.1)
        .unwrap_or(1.0);

    FactorScore::neutral(recency * meal)
}

fn mentions_keyword(candidate: &Candidate, keyword: &str) -> bool {
    if let Some(text) = &candidate.text {
        if text.to_lowercase().contains(keyword) {
            return true;
        }
    }
    candidate
        .categories
        .iter()
        .any(|c| c.to_lowercase().contains(keyword))
}

/// Scale of the popularity cap: this many weighted engagement points reach
/// the maximum score of 2.0.
const POPULARITY_SCALE: f32 = 50.0;

/// Weighted engagement, capped at 2.0 so a single viral item cannot dominate
/// the composition unboundedly.
pub fn popularity(candidate: &Candidate) -> FactorScore {
    let score = (candidate.engagement_weight() / POPULARITY_SCALE).min(2.0);
    FactorScore::neutral(score)
}

/// Fixed affinity increments over a neutral base of 1.0, capped at 2.0.
///
/// The "has any prior like/save" increment is a coarse signal unrelated to
/// the specific candidate; it is kept as-is deliberately.
pub fn behavioral_affinity(candidate: &Candidate, profile: &UserProfile) -> FactorScore {
    let mut score: f32 = 1.0;
    let mut reasons = Vec::new();

    if profile.liked_item_ids.contains(&candidate.id) {
        score += 0.3;
        reasons.push("you liked this before".to_string());
    }

    if let Some(author_id) = &candidate.author_id {
        if profile.followed_author_ids.contains(author_id) {
            score += 0.4;
            reasons.push("from an author you follow".to_string());
        }
    }

    if profile.saved_item_ids.contains(&candidate.id) {
        score += 0.3;
        reasons.push("you saved this".to_string());
    }

    if profile.has_engaged_before() {
        score += 0.2;
    }

    FactorScore {
        score: score.min(2.0),
        reasons,
    }
}
