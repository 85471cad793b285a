//! Shared test helpers: in-process fakes for every port and a store wrapper
//! that can be told to fail.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use moverwatch::domain::entities::daily_ranking::{DailyRanking, RankedSecurity, RankingUpsert};
use moverwatch::domain::entities::market_snapshot::{CompanyProfile, MarketSnapshot, MoverEntry};
use moverwatch::domain::entities::news_search::NewsSearchBatch;
use moverwatch::domain::entities::security::{Security, StaticProfile};
use moverwatch::domain::entities::security_metric::SecurityMetric;
use moverwatch::domain::error::DomainError;
use moverwatch::domain::ports::market_data::{MarketSnapshotProvider, ProfileProvider};
use moverwatch::domain::ports::market_repository::MarketRepository;
use moverwatch::domain::ports::search_provider::{SearchHit, SearchProvider};
use moverwatch::domain::ports::social_publisher::SocialPublisher;
use moverwatch::domain::ports::text_generator::TextGenerator;
use moverwatch::domain::values::category::RankingCategory;
use moverwatch::infrastructure::sqlite::market_repo::SqliteMarketRepo;
use moverwatch::{MoverWatch, Providers, Settings};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn mover(ticker: &str, price: &str, amount: &str, pct: &str) -> MoverEntry {
    MoverEntry {
        ticker: ticker.into(),
        price: price.into(),
        change_amount: amount.into(),
        change_percentage: pct.into(),
    }
}

/// Three gainers on 2025-01-01: AAA +5%, BBB +3%, CCC +1%.
pub fn abc_snapshot() -> MarketSnapshot {
    MarketSnapshot {
        last_updated: "2025-01-01 16:15:59 US/Eastern".into(),
        top_gainers: vec![
            mover("AAA", "21.00", "1.00", "5.0%"),
            mover("BBB", "10.30", "0.30", "3.0%"),
            mover("CCC", "1.01", "0.01", "1.0%"),
        ],
        top_losers: vec![mover("DDD", "9.00", "-1.00", "-10.0%")],
        most_active: vec![mover("AAA", "21.00", "1.00", "5.0%")],
    }
}

pub fn profile(ticker: &str, name: &str) -> CompanyProfile {
    CompanyProfile {
        symbol: ticker.into(),
        company_name: name.into(),
        sector: "Technology".into(),
        industry: "Software".into(),
        description: format!("{name} sells software."),
        website: format!("https://{}.example", ticker.to_lowercase()),
        country: "US".into(),
        full_time_employees: "1200".into(),
        image: String::new(),
        ipo_date: "2001-02-03".into(),
        ceo: "Jane Doe".into(),
        market_cap: 1.5e9,
        volume: 1_000_000,
        average_volume: 800_000,
        beta: 1.2,
        last_dividend: 0.0,
    }
}

// ---------------------------------------------------------------------------
// Snapshot feed
// ---------------------------------------------------------------------------

pub struct FakeFeed {
    pub snapshot: Mutex<MarketSnapshot>,
    pub configured: bool,
    pub calls: AtomicUsize,
}

impl FakeFeed {
    pub fn new(snapshot: MarketSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            configured: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new(MarketSnapshot::default())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketSnapshotProvider for FakeFeed {
    async fn fetch_snapshot(&self) -> Result<MarketSnapshot, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot.lock().unwrap().clone())
    }

    fn ensure_configured(&self) -> Result<(), DomainError> {
        if self.configured {
            Ok(())
        } else {
            Err(DomainError::Config("ALPHA_VANTAGE_API_KEY is not set".into()))
        }
    }
}

// ---------------------------------------------------------------------------
// Profile feed
// ---------------------------------------------------------------------------

pub struct FakeProfiles {
    pub profiles: Mutex<HashMap<String, CompanyProfile>>,
    pub configured: bool,
    pub calls: AtomicUsize,
}

impl FakeProfiles {
    pub fn new(profiles: Vec<CompanyProfile>) -> Self {
        Self {
            profiles: Mutex::new(profiles.into_iter().map(|p| (p.symbol.clone(), p)).collect()),
            configured: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn abc() -> Self {
        Self::new(vec![
            profile("AAA", "Alpha Inc"),
            profile("BBB", "Beta Corp"),
            profile("CCC", "Gamma Ltd"),
        ])
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new(vec![])
        }
    }

    pub fn set(&self, p: CompanyProfile) {
        self.profiles.lock().unwrap().insert(p.symbol.clone(), p);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileProvider for FakeProfiles {
    async fn fetch_profile(&self, ticker: &str) -> Result<CompanyProfile, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.profiles
            .lock()
            .unwrap()
            .get(ticker)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("No profile for {ticker}")))
    }

    fn ensure_configured(&self) -> Result<(), DomainError> {
        if self.configured {
            Ok(())
        } else {
            Err(DomainError::Config("FMP_API_KEY is not set".into()))
        }
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Returns `hits_per_query` hits per query. Queries containing any `fail_on`
/// fragment fail; queries containing any `hang_on` fragment never finish.
pub struct FakeSearch {
    pub hits_per_query: usize,
    pub fail_on: Vec<String>,
    pub hang_on: Vec<String>,
    pub configured: bool,
    pub queries: Mutex<Vec<String>>,
}

impl Default for FakeSearch {
    fn default() -> Self {
        Self {
            hits_per_query: 2,
            fail_on: Vec::new(),
            hang_on: Vec::new(),
            configured: true,
            queries: Mutex::new(Vec::new()),
        }
    }
}

impl FakeSearch {
    pub fn failing_on(fragments: &[&str]) -> Self {
        Self {
            fail_on: fragments.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn hanging_on(fragments: &[&str]) -> Self {
        Self {
            hang_on: fragments.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, DomainError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.hang_on.iter().any(|f| query.contains(f.as_str())) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.fail_on.iter().any(|f| query.contains(f.as_str())) {
            return Err(DomainError::Network(format!("search backend down for '{query}'")));
        }
        Ok((1..=self.hits_per_query)
            .map(|i| SearchHit {
                title: format!("{query} #{i}"),
                url: format!("https://news.example/{i}"),
                content: format!("Coverage {i} for {query}"),
                score: 1.0 / i as f64,
            })
            .collect())
    }

    fn ensure_configured(&self) -> Result<(), DomainError> {
        if self.configured {
            Ok(())
        } else {
            Err(DomainError::Config("TAVILY_API_KEY is not set".into()))
        }
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Replies `"<TICKER> rallied on strong demand."`, reading the ticker from the
/// prompt. Tickers in `fail_for` get an error.
pub struct FakeGenerator {
    pub fail_for: Vec<String>,
    pub configured: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl Default for FakeGenerator {
    fn default() -> Self {
        Self {
            fail_for: Vec::new(),
            configured: true,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl FakeGenerator {
    pub fn failing_for(tickers: &[&str]) -> Self {
        Self {
            fail_for: tickers.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::default()
        }
    }

    pub fn prompt_for(&self, ticker: &str) -> Option<String> {
        let needle = format!("Ticker: {ticker}\n");
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.starts_with(&needle))
            .cloned()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, _system_prompt: &str, user_prompt: &str) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(user_prompt.to_string());
        let ticker = user_prompt
            .lines()
            .next()
            .and_then(|l| l.strip_prefix("Ticker: "))
            .unwrap_or("?")
            .to_string();
        if self.fail_for.contains(&ticker) {
            return Err(DomainError::Generation(format!("model refused {ticker}")));
        }
        Ok(format!("  {ticker} rallied on strong demand.\n"))
    }

    fn ensure_configured(&self) -> Result<(), DomainError> {
        if self.configured {
            Ok(())
        } else {
            Err(DomainError::Config("OPENAI_API_KEY is not set".into()))
        }
    }
}

// ---------------------------------------------------------------------------
// Publisher
// ---------------------------------------------------------------------------

/// Records every post. Calls whose 1-based index is in `fail_calls` fail.
pub struct RecordingPublisher {
    pub fail_calls: Vec<usize>,
    pub configured: bool,
    pub calls: AtomicUsize,
    pub posts: Mutex<Vec<String>>,
}

impl Default for RecordingPublisher {
    fn default() -> Self {
        Self {
            fail_calls: Vec::new(),
            configured: true,
            calls: AtomicUsize::new(0),
            posts: Mutex::new(Vec::new()),
        }
    }
}

impl RecordingPublisher {
    pub fn failing_calls(calls: &[usize]) -> Self {
        Self {
            fail_calls: calls.to_vec(),
            ..Self::default()
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn posts(&self) -> Vec<String> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SocialPublisher for RecordingPublisher {
    async fn publish(&self, text: &str) -> Result<(), DomainError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_calls.contains(&call) {
            return Err(DomainError::Publish(format!("X API 503 on call {call}")));
        }
        self.posts.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn ensure_configured(&self) -> Result<(), DomainError> {
        if self.configured {
            Ok(())
        } else {
            Err(DomainError::Config("X_ACCESS_TOKEN is not set".into()))
        }
    }
}

// ---------------------------------------------------------------------------
// Store wrapper
// ---------------------------------------------------------------------------

/// SQLite store whose security upserts fail for the listed tickers (`"*"`
/// fails every ticker).
pub struct FlakyRepo {
    pub inner: SqliteMarketRepo,
    pub fail_tickers: Vec<String>,
}

impl FlakyRepo {
    pub fn failing_for(tickers: &[&str]) -> Self {
        Self {
            inner: SqliteMarketRepo::open(":memory:").unwrap(),
            fail_tickers: tickers.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl MarketRepository for FlakyRepo {
    fn upsert_security(&self, ticker: &str, profile: &StaticProfile) -> Result<Security, DomainError> {
        if self.fail_tickers.iter().any(|t| t == "*" || t == ticker) {
            return Err(DomainError::Database(format!("disk I/O error writing {ticker}")));
        }
        self.inner.upsert_security(ticker, profile)
    }

    fn find_security_by_ticker(&self, ticker: &str) -> Result<Security, DomainError> {
        self.inner.find_security_by_ticker(ticker)
    }

    fn upsert_ranking(&self, ranking: &RankingUpsert) -> Result<DailyRanking, DomainError> {
        self.inner.upsert_ranking(ranking)
    }

    fn unrank_unlisted(
        &self,
        date: NaiveDate,
        category: RankingCategory,
        listed: &[i64],
    ) -> Result<usize, DomainError> {
        self.inner.unrank_unlisted(date, category, listed)
    }

    fn update_ranking(&self, ranking: &DailyRanking) -> Result<(), DomainError> {
        self.inner.update_ranking(ranking)
    }

    fn find_rankings_by_date(
        &self,
        date: NaiveDate,
        category: RankingCategory,
        max_rank: u32,
    ) -> Result<Vec<RankedSecurity>, DomainError> {
        self.inner.find_rankings_by_date(date, category, max_rank)
    }

    fn find_ranking_by_date_rank_category(
        &self,
        date: NaiveDate,
        rank: u32,
        category: RankingCategory,
    ) -> Result<RankedSecurity, DomainError> {
        self.inner.find_ranking_by_date_rank_category(date, rank, category)
    }

    fn find_rankings_by_ticker(&self, ticker: &str) -> Result<Vec<RankedSecurity>, DomainError> {
        self.inner.find_rankings_by_ticker(ticker)
    }

    fn latest_ranking_date(&self, category: RankingCategory) -> Result<Option<NaiveDate>, DomainError> {
        self.inner.latest_ranking_date(category)
    }

    fn upsert_metric(&self, metric: &SecurityMetric) -> Result<(), DomainError> {
        self.inner.upsert_metric(metric)
    }

    fn find_metric(&self, security_id: i64, date: NaiveDate) -> Result<Option<SecurityMetric>, DomainError> {
        self.inner.find_metric(security_id, date)
    }

    fn create_news_batch(&self, batch: &NewsSearchBatch) -> Result<i64, DomainError> {
        self.inner.create_news_batch(batch)
    }

    fn find_latest_news_batch(&self, subject: &str) -> Result<Option<NewsSearchBatch>, DomainError> {
        self.inner.find_latest_news_batch(subject)
    }

    fn delete_news_batches_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        self.inner.delete_news_batches_before(cutoff)
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub repo: Arc<SqliteMarketRepo>,
    pub feed: Arc<FakeFeed>,
    pub profiles: Arc<FakeProfiles>,
    pub search: Arc<FakeSearch>,
    pub generator: Arc<FakeGenerator>,
    pub publisher: Arc<RecordingPublisher>,
}

pub fn test_settings() -> Settings {
    Settings {
        search_timeout: Duration::from_millis(200),
        post_delay: Duration::ZERO,
    }
}

impl Harness {
    pub fn new() -> Self {
        Self {
            repo: Arc::new(SqliteMarketRepo::open(":memory:").unwrap()),
            feed: Arc::new(FakeFeed::new(abc_snapshot())),
            profiles: Arc::new(FakeProfiles::abc()),
            search: Arc::new(FakeSearch::default()),
            generator: Arc::new(FakeGenerator::default()),
            publisher: Arc::new(RecordingPublisher::default()),
        }
    }

    pub fn providers(&self) -> Providers {
        Providers {
            snapshots: self.feed.clone(),
            profiles: self.profiles.clone(),
            search: self.search.clone(),
            generator: self.generator.clone(),
            publisher: self.publisher.clone(),
        }
    }

    pub fn app(&self) -> MoverWatch {
        MoverWatch::with_repository(self.repo.clone(), self.providers(), test_settings())
    }

    pub fn app_with_post_delay(&self, post_delay: Duration) -> MoverWatch {
        let settings = Settings {
            post_delay,
            ..test_settings()
        };
        MoverWatch::with_repository(self.repo.clone(), self.providers(), settings)
    }
}
