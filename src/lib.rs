pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::analysis::{AnalysisReport, AnalysisUseCase};
use crate::application::enrich_profile::{EnrichOutcome, EnrichProfileUseCase};
use crate::application::ingest_snapshot::{IngestReport, IngestSnapshotUseCase};
use crate::application::news_fanout::{NewsBatchReport, NewsFanOutUseCase, NewsQueryMode};
use crate::application::publish::{PostKind, PublishReport, PublishUseCase};
use crate::application::rankings::{Leaderboard, RankingQueryUseCase};
use crate::application::sync::{SyncPipeline, SyncReport};
use crate::config::AppConfig;
use crate::domain::entities::daily_ranking::RankedSecurity;
use crate::domain::entities::news_search::NewsSearchBatch;
use crate::domain::error::DomainError;
use crate::domain::ports::market_data::{MarketSnapshotProvider, ProfileProvider};
use crate::domain::ports::market_repository::MarketRepository;
use crate::domain::ports::search_provider::SearchProvider;
use crate::domain::ports::social_publisher::SocialPublisher;
use crate::domain::ports::text_generator::TextGenerator;
use crate::domain::values::category::RankingCategory;
use crate::infrastructure::feeds::alphavantage::AlphaVantageFeed;
use crate::infrastructure::feeds::fmp::FmpProfileFeed;
use crate::infrastructure::generation::openai::OpenAiChat;
use crate::infrastructure::publish::dry_run::DryRunPublisher;
use crate::infrastructure::publish::x::XPublisher;
use crate::infrastructure::search::tavily::TavilySearch;
use crate::infrastructure::sqlite::market_repo::SqliteMarketRepo;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;

/// External collaborators, one per port.
#[derive(Clone)]
pub struct Providers {
    pub snapshots: Arc<dyn MarketSnapshotProvider>,
    pub profiles: Arc<dyn ProfileProvider>,
    pub search: Arc<dyn SearchProvider>,
    pub generator: Arc<dyn TextGenerator>,
    pub publisher: Arc<dyn SocialPublisher>,
}

impl Providers {
    pub fn from_config(config: &AppConfig) -> Self {
        let publisher: Arc<dyn SocialPublisher> = if config.dry_run {
            Arc::new(DryRunPublisher)
        } else {
            Arc::new(XPublisher::new(config.x_access_token.clone()))
        };
        Self {
            snapshots: Arc::new(AlphaVantageFeed::new(config.alpha_vantage_api_key.clone())),
            profiles: Arc::new(FmpProfileFeed::new(config.fmp_api_key.clone())),
            search: Arc::new(TavilySearch::new(config.tavily_api_key.clone(), config.search_timeout)),
            generator: Arc::new(OpenAiChat::new(
                config.openai_api_key.clone(),
                config.openai_model.clone(),
            )),
            publisher,
        }
    }
}

/// Pipeline tuning that is not a credential.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    /// Per-query bound on a news search.
    pub search_timeout: Duration,
    /// Pause between consecutive posts.
    pub post_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_timeout: Duration::from_secs(15),
            post_delay: Duration::from_secs(5),
        }
    }
}

impl From<&AppConfig> for Settings {
    fn from(config: &AppConfig) -> Self {
        Self {
            search_timeout: config.search_timeout,
            post_delay: config.post_delay,
        }
    }
}

pub struct MoverWatch {
    ingest_uc: Arc<IngestSnapshotUseCase>,
    enrich_uc: Arc<EnrichProfileUseCase>,
    news_uc: NewsFanOutUseCase,
    analysis_uc: Arc<AnalysisUseCase>,
    publish_uc: PublishUseCase,
    rankings_uc: RankingQueryUseCase,
    sync: SyncPipeline,
}

impl MoverWatch {
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        Self::with_providers(&config.db_path, Providers::from_config(config), Settings::from(config))
    }

    pub fn with_providers(db_path: &str, providers: Providers, settings: Settings) -> Result<Self, DomainError> {
        let repo: Arc<dyn MarketRepository> = Arc::new(SqliteMarketRepo::open(db_path)?);
        Ok(Self::with_repository(repo, providers, settings))
    }

    /// Wire every use case around one shared store handle.
    pub fn with_repository(repo: Arc<dyn MarketRepository>, providers: Providers, settings: Settings) -> Self {
        let ingest_uc = Arc::new(IngestSnapshotUseCase::new(repo.clone(), providers.snapshots));
        let enrich_uc = Arc::new(EnrichProfileUseCase::new(repo.clone(), providers.profiles));
        let news_uc = NewsFanOutUseCase::new(repo.clone(), providers.search, settings.search_timeout);
        let analysis_uc = Arc::new(AnalysisUseCase::new(repo.clone(), news_uc.clone(), providers.generator));

        Self {
            sync: SyncPipeline::new(repo.clone(), ingest_uc.clone(), enrich_uc.clone(), analysis_uc.clone()),
            publish_uc: PublishUseCase::new(repo.clone(), providers.publisher, settings.post_delay),
            rankings_uc: RankingQueryUseCase::new(repo),
            ingest_uc,
            enrich_uc,
            news_uc,
            analysis_uc,
        }
    }

    pub async fn sync(&self) -> Result<SyncReport, DomainError> {
        self.sync.run().await
    }

    pub async fn ingest(&self) -> Result<IngestReport, DomainError> {
        self.ingest_uc.execute().await
    }

    pub fn latest(&self) -> Result<Leaderboard, DomainError> {
        self.rankings_uc.latest()
    }

    pub fn rankings(&self, date: NaiveDate, category: RankingCategory, max_rank: u32) -> Result<Leaderboard, DomainError> {
        self.rankings_uc.by_date(date, category, max_rank)
    }

    pub fn history(&self, ticker: &str) -> Result<Vec<RankedSecurity>, DomainError> {
        self.rankings_uc.history(ticker)
    }

    pub async fn enrich(&self, ticker: &str) -> Result<EnrichOutcome, DomainError> {
        self.enrich_uc.ensure_configured()?;
        self.enrich_uc.enrich(ticker).await
    }

    pub async fn analyze(&self, date: Option<NaiveDate>) -> Result<AnalysisReport, DomainError> {
        self.analysis_uc.run(date).await
    }

    pub async fn news(&self, subject: &str, mode: &NewsQueryMode) -> Result<NewsSearchBatch, DomainError> {
        self.news_uc.search_and_store(subject, mode).await
    }

    pub async fn news_many(&self, subjects: Vec<String>, mode: NewsQueryMode) -> Result<NewsBatchReport, DomainError> {
        self.news_uc.search_and_store_many(subjects, mode).await
    }

    pub fn latest_news(&self, subject: &str) -> Result<NewsSearchBatch, DomainError> {
        self.news_uc.latest(subject)
    }

    /// Delete news batches older than `days` days.
    pub fn prune_news(&self, days: u32) -> Result<usize, DomainError> {
        let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
        self.news_uc.prune_before(cutoff)
    }

    pub async fn post(&self, kind: PostKind, date: Option<NaiveDate>, rank: Option<u32>) -> Result<PublishReport, DomainError> {
        match (kind, rank) {
            (PostKind::Analysis, Some(rank)) => self.publish_uc.post_single_analysis(date, rank).await,
            (_, Some(_)) => Err(DomainError::InvalidInput("--rank only applies to analysis posts".into())),
            (kind, None) => self.publish_uc.publish(kind, date).await,
        }
    }

    pub fn compose_ranking_post(&self, date: NaiveDate) -> Result<String, DomainError> {
        self.publish_uc.compose_ranking(date)
    }

    pub fn compose_analysis_post(&self, date: NaiveDate, rank: u32) -> Result<String, DomainError> {
        self.publish_uc.compose_analysis(date, rank)
    }
}
