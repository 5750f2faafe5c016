use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use ranking_engine::models::{
    ingest_json, AuthorStatus, Candidate, CandidateKind, Engagement, Moderation,
};
use ranking_engine::{
    Coordinates, FeedMode, ProfileBuilder, ProfileSignals, RankingConfig, RankingEngine,
    UserProfile,
};

fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-08-20T12:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn candidate(id: &str) -> Candidate {
    Candidate {
        id: id.to_string(),
        kind: CandidateKind::Location,
        categories: vec!["coffee".to_string()],
        coordinates: None,
        created_at: Some(fixed_now() - Duration::hours(2)),
        author_id: Some(format!("author-{id}")),
        engagement: Engagement {
            likes: 10,
            comments: 2,
            saves: 1,
        },
        moderation: Moderation::default(),
        text: None,
    }
}

fn engine() -> RankingEngine {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    RankingEngine::new(RankingConfig::default())
}

#[test]
fn identical_inputs_produce_identical_output() {
    let pool: Vec<Candidate> = (0..20)
        .map(|i| {
            let mut c = candidate(&format!("c{i}"));
            c.engagement.likes = (i * 7 % 13) as u32;
            c.created_at = Some(fixed_now() - Duration::hours(i));
            c
        })
        .collect();

    let profile = UserProfile {
        interest_categories: vec!["coffee".to_string()],
        ..Default::default()
    };

    let first = engine()
        .rank(pool.clone(), Some(&profile), 10, fixed_now())
        .unwrap();
    let second = engine()
        .rank(pool, Some(&profile), 10, fixed_now())
        .unwrap();

    let ids = |r: &ranking_engine::RankedResult| -> Vec<String> {
        r.items.iter().map(|i| i.candidate.id.clone()).collect()
    };
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn result_length_is_min_of_limit_and_survivors() {
    let mut pool: Vec<Candidate> = (0..8).map(|i| candidate(&format!("c{i}"))).collect();
    pool[0].moderation.report_count = 10; // filtered out, 7 survive

    let result = engine().rank(pool.clone(), None, 5, fixed_now()).unwrap();
    assert_eq!(result.len(), 5);

    let result = engine().rank(pool, None, 50, fixed_now()).unwrap();
    assert_eq!(result.len(), 7);
}

#[test]
fn suspended_and_banned_authors_never_appear() {
    let mut pool: Vec<Candidate> = (0..10).map(|i| candidate(&format!("c{i}"))).collect();
    pool[2].moderation.author_status = AuthorStatus::Suspended;
    pool[5].moderation.author_status = AuthorStatus::Banned;
    // Make them overwhelmingly attractive by every other factor
    pool[2].engagement.likes = 100_000;
    pool[5].engagement.likes = 100_000;

    for limit in [1, 3, 10] {
        let result = engine().rank(pool.clone(), None, limit, fixed_now()).unwrap();
        assert!(result
            .items
            .iter()
            .all(|i| i.candidate.id != "c2" && i.candidate.id != "c5"));
    }
}

#[test]
fn over_reported_candidate_absent_even_when_it_would_rank_first() {
    let mut reported = candidate("reported");
    reported.engagement = Engagement {
        likes: 10_000,
        comments: 5_000,
        saves: 1_000,
    };
    reported.moderation.report_count = 10; // threshold is 5

    let plain = candidate("plain");

    let result = engine()
        .rank(vec![reported, plain], None, 10, fixed_now())
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.items[0].candidate.id, "plain");
    assert_eq!(result.stats.filtered_count, 1);
}

#[test]
fn empty_profile_orders_by_popularity_and_recency() {
    let mut viral = candidate("viral");
    viral.engagement.likes = 400;
    let mut stale = candidate("stale");
    stale.engagement.likes = 0;
    stale.created_at = Some(fixed_now() - Duration::days(30));
    stale.categories = vec!["hiking".to_string()];

    let empty = UserProfile::anonymous();
    let result = engine()
        .rank(vec![stale, viral], Some(&empty), 10, fixed_now())
        .unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.items[0].candidate.id, "viral");
}

#[test]
fn homogeneous_pool_still_fills_limit() {
    // 50 candidates, one shared primary category, distinct authors
    let pool: Vec<Candidate> = (0..50)
        .map(|i| {
            let mut c = candidate(&format!("c{i}"));
            c.engagement.likes = 50 - i as u32;
            c
        })
        .collect();

    let result = engine().rank(pool, None, 10, fixed_now()).unwrap();
    assert_eq!(result.len(), 10);
}

#[test]
fn closer_candidate_outranks_distant_twin() {
    let mut near = candidate("near");
    near.coordinates = Some(Coordinates::new(40.0, -73.0));
    let mut far = candidate("far");
    far.coordinates = Some(Coordinates::new(40.27, -73.0)); // ~30 km away
    far.author_id = near.author_id.clone();

    let profile = UserProfile {
        coordinates: Some(Coordinates::new(40.0, -73.0)),
        ..Default::default()
    };

    let result = engine()
        .rank(vec![far, near], Some(&profile), 10, fixed_now())
        .unwrap();

    assert_eq!(result.items[0].candidate.id, "near");
    let near_item = &result.items[0];
    let far_item = &result.items[1];
    assert!(near_item.breakdown.composed > far_item.breakdown.composed);
    assert!(near_item
        .match_reasons
        .iter()
        .any(|r| r.contains("very close")));
}

#[test]
fn interest_overlap_outranks_mismatch() {
    let mut coffee = candidate("coffee-place");
    coffee.categories = vec!["coffee shop".to_string()];
    let mut club = candidate("club");
    club.categories = vec!["nightlife".to_string()];

    let profile = ProfileBuilder::new().build(ProfileSignals {
        interests: vec!["coffee".to_string()],
        ..Default::default()
    });

    let result = engine()
        .rank(vec![club, coffee], Some(&profile), 10, fixed_now())
        .unwrap();

    assert_eq!(result.items[0].candidate.id, "coffee-place");
    assert!(result.items[0]
        .match_reasons
        .iter()
        .any(|r| r.contains("coffee")));
    assert!(
        result.items[0].breakdown.interest > result.items[1].breakdown.interest
    );
}

#[test]
fn behavioral_signals_boost_followed_author() {
    let followed = candidate("from-friend");
    let other = candidate("from-stranger");

    let profile = ProfileBuilder::new().build(ProfileSignals {
        followed_author_ids: vec!["author-from-friend".to_string()],
        ..Default::default()
    });

    let result = engine()
        .rank(vec![other, followed], Some(&profile), 10, fixed_now())
        .unwrap();

    assert_eq!(result.items[0].candidate.id, "from-friend");
    assert!(result.items[0]
        .match_reasons
        .iter()
        .any(|r| r.contains("follow")));
}

#[test]
fn json_ingestion_feeds_the_pipeline() {
    let now = fixed_now();
    let records = vec![
        json!({
            "id": "loc-1",
            "kind": "location",
            "categories": ["coffee shop"],
            "created_at": "2026-08-20T10:00:00Z",
            "likes": 30
        }),
        json!({
            "id": "bad-1",
            "kind": "post",
            "text": "limited time scam offer",
            "created_at": "2026-08-20T11:00:00Z"
        }),
        json!({
            "id": "no-timestamp",
            "kind": "event"
        }),
    ];

    let candidates = ingest_json(records);
    assert_eq!(candidates.len(), 3);

    let result = engine().rank(candidates, None, 10, now).unwrap();
    let ids: Vec<&str> = result.items.iter().map(|i| i.candidate.id.as_str()).collect();

    assert!(!ids.contains(&"bad-1"));
    assert!(ids.contains(&"loc-1"));
    assert!(ids.contains(&"no-timestamp"));
}

#[test]
fn garbage_timestamp_does_not_outrank_dated_content() {
    let now = fixed_now();
    let records = vec![
        json!({
            "id": "garbage-ts",
            "kind": "post",
            "created_at": "not-a-date",
            "likes": 10
        }),
        json!({
            "id": "two-hours-old",
            "kind": "post",
            "created_at": "2026-08-20T10:30:00Z",
            "likes": 10
        }),
    ];

    let candidates = ingest_json(records);
    assert!(candidates[0].created_at.is_none());

    let result = engine().rank(candidates, None, 10, now).unwrap();

    // Identical engagement; the dated candidate earns a recency boost while
    // the unknown age stays at the neutral multiplier.
    assert_eq!(result.items[0].candidate.id, "two-hours-old");
    assert!(
        result.items[0].breakdown.temporal > result.items[1].breakdown.temporal
    );
    assert!((result.items[1].breakdown.temporal - 1.0).abs() < 1e-6);
}

#[test]
fn recommended_mode_matches_rank_and_other_modes_stay_simple() {
    let pool: Vec<Candidate> = (0..5).map(|i| candidate(&format!("c{i}"))).collect();
    let now = fixed_now();

    let via_rank = engine().rank(pool.clone(), None, 3, now).unwrap();
    let via_mode = engine()
        .rank_feed(FeedMode::Recommended, pool.clone(), None, 3, now)
        .unwrap();
    let rank_ids: Vec<&str> = via_rank.items.iter().map(|i| i.candidate.id.as_str()).collect();
    let mode_ids: Vec<&str> = via_mode.items.iter().map(|i| i.candidate.id.as_str()).collect();
    assert_eq!(rank_ids, mode_ids);

    let latest = engine()
        .rank_feed(FeedMode::Latest, pool, None, 3, now)
        .unwrap();
    assert!(latest
        .items
        .iter()
        .all(|i| i.breakdown.composed == 0.0 && i.match_reasons.is_empty()));
}
