pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{FactorWeights, GeoDecayPolicy, RankingConfig};
pub use models::{
    Candidate, CandidateKind, Coordinates, FeedMode, RankedItem, RankedResult, UserProfile,
};
pub use services::{
    DiversifiedSelector, InteractionDedupCache, ProfileBuilder, ProfileSignals, RankingEngine,
    RankingError, SafetyFilter, ScoreComposer,
};
