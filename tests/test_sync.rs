mod common;

use common::*;
use moverwatch::domain::error::DomainError;
use moverwatch::domain::ports::market_repository::MarketRepository;
use moverwatch::domain::values::category::RankingCategory;
use moverwatch::MoverWatch;
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[tokio::test]
async fn test_end_to_end_sync() {
    let h = Harness::new();
    let app = h.app();

    let report = app.sync().await.unwrap();
    assert_eq!(report.date, day(2025, 1, 1));
    assert_eq!(report.ingest.stored_total(), 5);
    assert_eq!(report.enrich.enriched, vec!["AAA", "BBB", "CCC"]);
    assert!(report.enrich.failures.is_empty());
    assert_eq!(report.analysis.analyzed, vec!["AAA", "BBB", "CCC"]);

    let board = app.latest().unwrap();
    assert_eq!(board.date, day(2025, 1, 1));
    let names: Vec<&str> = board
        .rankings
        .iter()
        .map(|r| r.security.display_name())
        .collect();
    assert_eq!(names, vec!["Alpha Inc", "Beta Corp", "Gamma Ltd"]);
    assert!(board.rankings.iter().all(|r| !r.ranking.ai_analysis.is_empty()));

    // DDD is a loser only: stored, never enriched.
    let ddd = h.repo.find_security_by_ticker("DDD").unwrap();
    assert!(!ddd.is_enriched());
}

#[tokio::test]
async fn test_missing_credential_aborts_before_any_request() {
    let mut h = Harness::new();
    h.profiles = Arc::new(FakeProfiles::unconfigured());

    let err = h.app().sync().await.unwrap_err();
    assert!(matches!(err, DomainError::Config(_)));
    assert_eq!(h.feed.calls(), 0);
    assert_eq!(h.search.calls(), 0);
    assert!(h.repo.latest_ranking_date(RankingCategory::TopGainers).unwrap().is_none());
}

#[tokio::test]
async fn test_enrich_and_analysis_failures_are_soft() {
    let mut h = Harness::new();
    h.profiles = Arc::new(FakeProfiles::new(vec![
        profile("AAA", "Alpha Inc"),
        profile("CCC", "Gamma Ltd"),
    ]));
    h.generator = Arc::new(FakeGenerator::failing_for(&["CCC"]));

    let report = h.app().sync().await.unwrap();
    assert_eq!(report.enrich.enriched, vec!["AAA", "CCC"]);
    assert_eq!(report.enrich.failures[0].item, "BBB");
    assert_eq!(report.analysis.analyzed, vec!["AAA", "BBB"]);
    assert_eq!(report.analysis.skipped[0].item, "CCC");

    // Unenriched BBB is still analysed; its posts fall back to the ticker.
    let bbb = h
        .repo
        .find_ranking_by_date_rank_category(day(2025, 1, 1), 2, RankingCategory::TopGainers)
        .unwrap();
    assert_eq!(bbb.security.display_name(), "BBB");
    assert_eq!(bbb.ranking.ai_analysis, "BBB rallied on strong demand.");
}

#[tokio::test]
async fn test_sync_fails_when_nothing_could_be_stored() {
    let h = Harness::new();
    let repo = Arc::new(FlakyRepo::failing_for(&["*"]));
    let app = MoverWatch::with_repository(repo, h.providers(), test_settings());

    let err = app.sync().await.unwrap_err();
    assert!(matches!(err, DomainError::Database(_)));
    assert!(err.to_string().contains("none were stored"));
    assert_eq!(h.profiles.calls(), 0);
}

#[tokio::test]
async fn test_second_sync_same_day_keeps_rows_unique() {
    let h = Harness::new();
    let app = h.app();
    app.sync().await.unwrap();
    app.sync().await.unwrap();

    let history = app.history("AAA").unwrap();
    assert_eq!(history.len(), 2);
    let gainers = h
        .repo
        .find_rankings_by_date(day(2025, 1, 1), RankingCategory::TopGainers, 100)
        .unwrap();
    assert_eq!(gainers.len(), 3);
}
