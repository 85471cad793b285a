use crate::application::news_fanout::{NewsFanOutUseCase, NewsQueryMode};
use crate::application::ItemFailure;
use crate::domain::entities::daily_ranking::RankedSecurity;
use crate::domain::entities::security::Security;
use crate::domain::error::DomainError;
use crate::domain::ports::market_repository::MarketRepository;
use crate::domain::ports::text_generator::TextGenerator;
use crate::domain::values::category::RankingCategory;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

/// Rows the daily loop analyses: the top of the gainers board.
pub const ANALYSIS_DEPTH: u32 = 5;

pub const SYSTEM_PROMPT: &str = "You are a US equity analyst. In 150 characters or fewer, explain why this stock \
moved today, citing the most relevant catalyst from the news provided. If no news is provided, give the most \
plausible reason based on the company's business description and the size of the move. Reply with the \
explanation only.";

/// User message for one security: ticker, move size, business context and
/// the news blocks (or `none`).
pub fn build_user_prompt(security: &Security, change_rate: f64, news_blocks: &[String]) -> String {
    let mut prompt = format!(
        "Ticker: {}\nCompany: {}\nChange: {:+.2}%\n",
        security.ticker,
        security.display_name(),
        change_rate
    );
    if !security.profile.description.is_empty() {
        prompt.push_str(&format!("Business: {}\n", security.profile.description));
    }
    prompt.push_str("News:\n");
    if news_blocks.is_empty() {
        prompt.push_str("none\n");
    } else {
        for block in news_blocks {
            prompt.push_str(&format!("- {}\n", block.trim_end()));
        }
    }
    prompt
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub date: NaiveDate,
    pub analyzed: Vec<String>,
    pub skipped: Vec<ItemFailure>,
}

pub struct AnalysisUseCase {
    repo: Arc<dyn MarketRepository>,
    news: NewsFanOutUseCase,
    generator: Arc<dyn TextGenerator>,
}

impl AnalysisUseCase {
    pub fn new(repo: Arc<dyn MarketRepository>, news: NewsFanOutUseCase, generator: Arc<dyn TextGenerator>) -> Self {
        Self { repo, news, generator }
    }

    pub fn ensure_configured(&self) -> Result<(), DomainError> {
        self.generator.ensure_configured()?;
        self.news.ensure_configured()
    }

    /// Analyse the top gainers of `date`, or of the latest stored date.
    pub async fn run(&self, date: Option<NaiveDate>) -> Result<AnalysisReport, DomainError> {
        let date = match date {
            Some(d) => d,
            None => self
                .repo
                .latest_ranking_date(RankingCategory::TopGainers)?
                .ok_or_else(|| DomainError::NotFound("No rankings stored yet".into()))?,
        };
        self.run_for_date(date).await
    }

    /// One security at a time; a failure skips that security only.
    pub async fn run_for_date(&self, date: NaiveDate) -> Result<AnalysisReport, DomainError> {
        self.ensure_configured()?;
        let rows = self
            .repo
            .find_rankings_by_date(date, RankingCategory::TopGainers, ANALYSIS_DEPTH)?;
        if rows.is_empty() {
            tracing::warn!(%date, "no top gainers to analyse");
        }

        let mut report = AnalysisReport {
            date,
            analyzed: Vec::new(),
            skipped: Vec::new(),
        };
        for row in rows {
            let ticker = row.security.ticker.clone();
            match self.analyze_row(row).await {
                Ok(_) => report.analyzed.push(ticker),
                Err(e) => {
                    tracing::warn!(ticker = %ticker, error = %e, "analysis skipped");
                    report.skipped.push(ItemFailure::new(ticker, e));
                }
            }
        }

        tracing::info!(
            %date,
            analyzed = report.analyzed.len(),
            skipped = report.skipped.len(),
            "analysis finished"
        );
        Ok(report)
    }

    /// Gather movement news, ask for a rationale and store both on the row.
    /// Nothing is written when generation fails.
    pub async fn analyze_row(&self, row: RankedSecurity) -> Result<String, DomainError> {
        let ticker = &row.security.ticker;
        let (blocks, corpus) = match self.news.search_and_store(ticker, &NewsQueryMode::Movement).await {
            Ok(batch) => (batch.blocks(), batch.combined_content),
            Err(e) => {
                tracing::info!(ticker = %ticker, error = %e, "no news, analysing from profile only");
                (Vec::new(), String::new())
            }
        };

        let prompt = build_user_prompt(&row.security, row.ranking.change_rate, &blocks);
        let reply = self.generator.generate(SYSTEM_PROMPT, &prompt).await?;
        let analysis = reply.trim().to_string();
        if analysis.is_empty() {
            return Err(DomainError::Generation(format!("empty analysis for {ticker}")));
        }

        let mut ranking = row.ranking;
        ranking.news_summary = corpus;
        ranking.ai_analysis = analysis.clone();
        self.repo.update_ranking(&ranking)?;
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::security::StaticProfile;

    fn security(description: &str) -> Security {
        Security {
            id: 1,
            ticker: "AAA".into(),
            profile: StaticProfile {
                name: "Alpha Inc".into(),
                description: description.into(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_prompt_without_news() {
        let prompt = build_user_prompt(&security(""), 5.0, &[]);
        assert_eq!(prompt, "Ticker: AAA\nCompany: Alpha Inc\nChange: +5.00%\nNews:\nnone\n");
    }

    #[test]
    fn test_prompt_with_business_and_news() {
        let blocks = vec!["Query: q\nTitle: t\nContent: c\nURL: u\n\n".to_string()];
        let prompt = build_user_prompt(&security("Makes widgets."), 12.5, &blocks);
        assert!(prompt.contains("Change: +12.50%\n"));
        assert!(prompt.contains("Business: Makes widgets.\n"));
        assert!(prompt.ends_with("- Query: q\nTitle: t\nContent: c\nURL: u\n"));
    }
}
