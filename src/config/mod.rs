use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a valid {expected}, got '{value}'")]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Fixed weights applied by the score composer. Sum to 1.0 together with the
/// diversity share, which the selector applies iteratively as a per-item
/// penalty step rather than as a factor score.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FactorWeights {
    pub interest: f32,
    pub geo: f32,
    pub temporal: f32,
    pub popularity: f32,
    pub behavioral: f32,
    pub diversity: f32,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            interest: 0.30,
            geo: 0.20,
            temporal: 0.15,
            popularity: 0.20,
            behavioral: 0.10,
            diversity: 0.05,
        }
    }
}

/// Which distance-decay curve the geo scorer applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoDecayPolicy {
    /// Feed-style: exp(-distance / decay_radius_km), never reaches zero.
    Exponential,
    /// Explorer-style: linear decay within travel_radius_km, zero beyond it.
    RadiusLinear,
}

/// Engine configuration. All tuning knobs live here; nothing is hardcoded in
/// the scorers or the selector.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    pub weights: FactorWeights,
    /// Max items sharing a primary category before further ones are deferred
    /// to the relaxed pass.
    pub category_cap: usize,
    /// Penalty step per already-selected item from the same author.
    pub author_penalty: f32,
    /// Report count above which a candidate is dropped before scoring.
    pub report_threshold: u32,
    /// Scale of the exponential geo decay.
    pub decay_radius_km: f64,
    /// Hard cutoff radius for the explorer decay policy.
    pub travel_radius_km: f64,
    pub geo_policy: GeoDecayPolicy,
    /// Case-insensitive substrings that exclude a candidate outright.
    pub blocked_keywords: Vec<String>,
    /// Fraction of the requested limit below which the category cap is not
    /// yet enforced (bootstrap exception for homogeneous pools).
    pub bootstrap_fraction: f32,
    /// Lowest value the diversity penalty multiplier can reach.
    pub diversity_floor: f32,
    /// Idempotency window for the interaction dedup cache.
    pub dedup_window: Duration,
}

const DEFAULT_BLOCKED_KEYWORDS: &[&str] = &[
    "spam",
    "scam",
    "counterfeit",
    "nsfw",
    "gore",
    "hate speech",
];

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            category_cap: 3,
            author_penalty: 0.10,
            report_threshold: 5,
            decay_radius_km: 25.0,
            travel_radius_km: 50.0,
            geo_policy: GeoDecayPolicy::Exponential,
            blocked_keywords: DEFAULT_BLOCKED_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            bootstrap_fraction: 0.3,
            diversity_floor: 0.5,
            dedup_window: Duration::from_secs(5),
        }
    }
}

impl RankingConfig {
    /// Load config from the environment, falling back to defaults per field.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let weights = FactorWeights {
            interest: parse_env("RANKING_INTEREST_WEIGHT", defaults.weights.interest)?,
            geo: parse_env("RANKING_GEO_WEIGHT", defaults.weights.geo)?,
            temporal: parse_env("RANKING_TEMPORAL_WEIGHT", defaults.weights.temporal)?,
            popularity: parse_env("RANKING_POPULARITY_WEIGHT", defaults.weights.popularity)?,
            behavioral: parse_env("RANKING_BEHAVIORAL_WEIGHT", defaults.weights.behavioral)?,
            diversity: parse_env("RANKING_DIVERSITY_WEIGHT", defaults.weights.diversity)?,
        };

        let geo_policy = match env::var("RANKING_GEO_POLICY") {
            Ok(raw) => match raw.to_ascii_lowercase().as_str() {
                "exponential" => GeoDecayPolicy::Exponential,
                "radius_linear" | "radiuslinear" => GeoDecayPolicy::RadiusLinear,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "RANKING_GEO_POLICY",
                        expected: "one of exponential, radius_linear",
                        value: raw,
                    })
                }
            },
            Err(_) => defaults.geo_policy,
        };

        let blocked_keywords = match env::var("RANKING_BLOCKED_KEYWORDS") {
            Ok(raw) => raw
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
            Err(_) => defaults.blocked_keywords,
        };

        Ok(Self {
            weights,
            category_cap: parse_env("RANKING_CATEGORY_CAP", defaults.category_cap)?,
            author_penalty: parse_env("RANKING_AUTHOR_PENALTY", defaults.author_penalty)?,
            report_threshold: parse_env("RANKING_REPORT_THRESHOLD", defaults.report_threshold)?,
            decay_radius_km: parse_env("RANKING_DECAY_RADIUS_KM", defaults.decay_radius_km)?,
            travel_radius_km: parse_env("RANKING_TRAVEL_RADIUS_KM", defaults.travel_radius_km)?,
            geo_policy,
            blocked_keywords,
            bootstrap_fraction: parse_env(
                "RANKING_BOOTSTRAP_FRACTION",
                defaults.bootstrap_fraction,
            )?,
            diversity_floor: parse_env("RANKING_DIVERSITY_FLOOR", defaults.diversity_floor)?,
            dedup_window: Duration::from_secs(parse_env(
                "RANKING_DEDUP_WINDOW_SECS",
                defaults.dedup_window.as_secs(),
            )?),
        })
    }
}

fn parse_env<T: FromStr + Copy>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            key,
            expected: std::any::type_name::<T>(),
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}
