use crate::domain::entities::daily_ranking::{DailyRanking, RankedSecurity, RankingUpsert};
use crate::domain::entities::news_search::{NewsItem, NewsSearchBatch};
use crate::domain::entities::security::{Security, StaticProfile};
use crate::domain::entities::security_metric::SecurityMetric;
use crate::domain::error::DomainError;
use crate::domain::ports::market_repository::MarketRepository;
use crate::domain::values::category::RankingCategory;
use crate::infrastructure::sqlite::migrations::run_migrations;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Mutex, MutexGuard};

const DATE_FMT: &str = "%Y-%m-%d";

const SECURITY_COLS: &str =
    "id, ticker, name, sector, industry, description, website, country, employees, logo, ipo_date, ceo";

/// Rankings joined with their security. Ranking columns come first (0..=9),
/// security columns follow (10..=21).
const RANKED_SELECT: &str = "SELECT r.id, r.security_id, r.date, r.category, r.rank, r.change_amount, r.change_rate, r.price, r.news_summary, r.ai_analysis,
        s.id, s.ticker, s.name, s.sector, s.industry, s.description, s.website, s.country, s.employees, s.logo, s.ipo_date, s.ceo
     FROM daily_rankings r JOIN securities s ON s.id = r.security_id";

pub struct SqliteMarketRepo {
    conn: Mutex<Connection>,
}

impl SqliteMarketRepo {
    /// Open (or create) the database at `path` and bring the schema up to date.
    /// `":memory:"` gives a private in-memory store.
    pub fn open(path: &str) -> Result<Self, DomainError> {
        let conn = Connection::open(path).map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;
        run_migrations(&conn)?;
        Ok(Self::new(conn))
    }

    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, DomainError> {
        self.conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    fn row_to_security(row: &rusqlite::Row, offset: usize) -> Result<Security, rusqlite::Error> {
        Ok(Security {
            id: row.get(offset)?,
            ticker: row.get(offset + 1)?,
            profile: StaticProfile {
                name: row.get(offset + 2)?,
                sector: row.get(offset + 3)?,
                industry: row.get(offset + 4)?,
                description: row.get(offset + 5)?,
                website: row.get(offset + 6)?,
                country: row.get(offset + 7)?,
                employees: row.get(offset + 8)?,
                logo: row.get(offset + 9)?,
                ipo_date: row.get(offset + 10)?,
                ceo: row.get(offset + 11)?,
            },
        })
    }

    fn row_to_ranked(row: &rusqlite::Row) -> Result<RankedSecurity, rusqlite::Error> {
        let date_str: String = row.get(2)?;
        let cat_str: String = row.get(3)?;

        let ranking = DailyRanking {
            id: row.get(0)?,
            security_id: row.get(1)?,
            date: parse_date_col(2, &date_str)?,
            category: cat_str
                .parse()
                .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into()))?,
            rank: row.get(4)?,
            change_amount: row.get(5)?,
            change_rate: row.get(6)?,
            price: row.get(7)?,
            news_summary: row.get(8)?,
            ai_analysis: row.get(9)?,
        };

        Ok(RankedSecurity {
            ranking,
            security: Self::row_to_security(row, 10)?,
        })
    }

    fn query_ranked(
        conn: &Connection,
        sql: &str,
        params: &[&dyn rusqlite::types::ToSql],
    ) -> Result<Vec<RankedSecurity>, DomainError> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, Self::row_to_ranked)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn parse_date_col(idx: usize, s: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(s, DATE_FMT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn fmt_date(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

/// Fixed-width UTC stamp so text comparison matches time order.
fn fmt_instant(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl MarketRepository for SqliteMarketRepo {
    fn upsert_security(&self, ticker: &str, profile: &StaticProfile) -> Result<Security, DomainError> {
        let conn = self.conn()?;
        let now = fmt_instant(Utc::now());
        conn.execute(
            "INSERT INTO securities (ticker, name, sector, industry, description, website, country, employees, logo, ipo_date, ceo, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
             ON CONFLICT(ticker) DO UPDATE SET
                name = CASE WHEN securities.name = '' THEN excluded.name ELSE securities.name END,
                sector = CASE WHEN securities.sector = '' THEN excluded.sector ELSE securities.sector END,
                industry = CASE WHEN securities.industry = '' THEN excluded.industry ELSE securities.industry END,
                description = CASE WHEN securities.description = '' THEN excluded.description ELSE securities.description END,
                website = CASE WHEN securities.website = '' THEN excluded.website ELSE securities.website END,
                country = CASE WHEN securities.country = '' THEN excluded.country ELSE securities.country END,
                employees = CASE WHEN securities.employees = 0 THEN excluded.employees ELSE securities.employees END,
                logo = CASE WHEN securities.logo = '' THEN excluded.logo ELSE securities.logo END,
                ipo_date = CASE WHEN securities.ipo_date = '' THEN excluded.ipo_date ELSE securities.ipo_date END,
                ceo = CASE WHEN securities.ceo = '' THEN excluded.ceo ELSE securities.ceo END,
                updated_at = excluded.updated_at",
            params![
                ticker,
                profile.name,
                profile.sector,
                profile.industry,
                profile.description,
                profile.website,
                profile.country,
                profile.employees,
                profile.logo,
                profile.ipo_date,
                profile.ceo,
                now,
            ],
        )
        .map_err(|e| DomainError::Database(format!("Failed to upsert security {ticker}: {e}")))?;

        conn.query_row(
            &format!("SELECT {SECURITY_COLS} FROM securities WHERE ticker = ?1"),
            params![ticker],
            |row| Self::row_to_security(row, 0),
        )
        .map_err(DomainError::from)
    }

    fn find_security_by_ticker(&self, ticker: &str) -> Result<Security, DomainError> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {SECURITY_COLS} FROM securities WHERE ticker = ?1"),
            params![ticker],
            |row| Self::row_to_security(row, 0),
        )
        .optional()?
        .ok_or_else(|| DomainError::NotFound(format!("Security not found: {ticker}")))
    }

    fn upsert_ranking(&self, r: &RankingUpsert) -> Result<DailyRanking, DomainError> {
        let mut conn = self.conn()?;
        let now = fmt_instant(Utc::now());
        let date = fmt_date(r.date);
        let category = r.category.to_string();
        let tx = conn.transaction()?;
        // A rank has one holder per (date, category); the previous one is unranked.
        tx.execute(
            "UPDATE daily_rankings SET rank = 0, updated_at = ?5
             WHERE date = ?1 AND category = ?2 AND rank = ?3 AND security_id <> ?4",
            params![date, category, r.rank, r.security_id, now],
        )
        .map_err(|e| DomainError::Database(format!("Failed to release rank {}: {e}", r.rank)))?;
        tx.execute(
            "INSERT INTO daily_rankings (security_id, date, category, rank, change_amount, change_rate, price, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
             ON CONFLICT(security_id, date, category) DO UPDATE SET
                rank = excluded.rank,
                change_amount = excluded.change_amount,
                change_rate = excluded.change_rate,
                price = excluded.price,
                updated_at = excluded.updated_at",
            params![r.security_id, date, category, r.rank, r.change_amount, r.change_rate, r.price, now],
        )
        .map_err(|e| DomainError::Database(format!("Failed to upsert ranking: {e}")))?;

        let sql = format!("{RANKED_SELECT} WHERE r.security_id = ?1 AND r.date = ?2 AND r.category = ?3");
        let stored = Self::query_ranked(&tx, &sql, &[&r.security_id, &date, &category])?
            .pop()
            .map(|row| row.ranking)
            .ok_or_else(|| DomainError::Database("Upserted ranking vanished".into()))?;
        tx.commit()?;
        Ok(stored)
    }

    fn unrank_unlisted(
        &self,
        date: NaiveDate,
        category: RankingCategory,
        listed: &[i64],
    ) -> Result<usize, DomainError> {
        let conn = self.conn()?;
        let ids = listed.iter().map(i64::to_string).collect::<Vec<_>>().join(",");
        let sql = format!(
            "UPDATE daily_rankings SET rank = 0, updated_at = ?3
             WHERE date = ?1 AND category = ?2 AND rank >= 1 AND security_id NOT IN ({ids})"
        );
        let rows = conn
            .execute(&sql, params![fmt_date(date), category.to_string(), fmt_instant(Utc::now())])
            .map_err(|e| DomainError::Database(format!("Failed to unrank stale rows: {e}")))?;
        Ok(rows)
    }

    fn update_ranking(&self, ranking: &DailyRanking) -> Result<(), DomainError> {
        let conn = self.conn()?;
        let rows = conn
            .execute(
                "UPDATE daily_rankings SET rank = ?1, change_amount = ?2, change_rate = ?3, price = ?4,
                    news_summary = ?5, ai_analysis = ?6, updated_at = ?7
                 WHERE id = ?8",
                params![
                    ranking.rank,
                    ranking.change_amount,
                    ranking.change_rate,
                    ranking.price,
                    ranking.news_summary,
                    ranking.ai_analysis,
                    fmt_instant(Utc::now()),
                    ranking.id,
                ],
            )
            .map_err(|e| DomainError::Database(format!("Failed to update ranking: {e}")))?;
        if rows == 0 {
            return Err(DomainError::NotFound(format!("Ranking not found: {}", ranking.id)));
        }
        Ok(())
    }

    fn find_rankings_by_date(
        &self,
        date: NaiveDate,
        category: RankingCategory,
        max_rank: u32,
    ) -> Result<Vec<RankedSecurity>, DomainError> {
        let conn = self.conn()?;
        let sql = format!("{RANKED_SELECT} WHERE r.date = ?1 AND r.category = ?2 AND r.rank BETWEEN 1 AND ?3 ORDER BY r.rank ASC");
        Self::query_ranked(&conn, &sql, &[&fmt_date(date), &category.to_string(), &max_rank])
    }

    fn find_ranking_by_date_rank_category(
        &self,
        date: NaiveDate,
        rank: u32,
        category: RankingCategory,
    ) -> Result<RankedSecurity, DomainError> {
        let conn = self.conn()?;
        let sql = format!("{RANKED_SELECT} WHERE r.date = ?1 AND r.rank = ?2 AND r.rank >= 1 AND r.category = ?3");
        Self::query_ranked(&conn, &sql, &[&fmt_date(date), &rank, &category.to_string()])?
            .pop()
            .ok_or_else(|| DomainError::NotFound(format!("No {category} ranking #{rank} on {date}")))
    }

    fn find_rankings_by_ticker(&self, ticker: &str) -> Result<Vec<RankedSecurity>, DomainError> {
        let conn = self.conn()?;
        let sql = format!("{RANKED_SELECT} WHERE s.ticker = ?1 AND r.rank >= 1 ORDER BY r.date DESC, r.category ASC");
        Self::query_ranked(&conn, &sql, &[&ticker])
    }

    fn latest_ranking_date(&self, category: RankingCategory) -> Result<Option<NaiveDate>, DomainError> {
        let conn = self.conn()?;
        let latest: Option<String> = conn.query_row(
            "SELECT MAX(date) FROM daily_rankings WHERE category = ?1 AND rank >= 1",
            params![category.to_string()],
            |row| row.get(0),
        )?;
        latest
            .map(|s| parse_date_col(0, &s).map_err(DomainError::from))
            .transpose()
    }

    fn upsert_metric(&self, m: &SecurityMetric) -> Result<(), DomainError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO security_metrics (security_id, date, market_cap, volume, average_volume, beta, last_dividend, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(security_id, date) DO UPDATE SET
                market_cap = excluded.market_cap,
                volume = excluded.volume,
                average_volume = excluded.average_volume,
                beta = excluded.beta,
                last_dividend = excluded.last_dividend,
                updated_at = excluded.updated_at",
            params![
                m.security_id,
                fmt_date(m.date),
                m.market_cap,
                m.volume,
                m.average_volume,
                m.beta,
                m.last_dividend,
                fmt_instant(Utc::now()),
            ],
        )
        .map_err(|e| DomainError::Database(format!("Failed to upsert metric: {e}")))?;
        Ok(())
    }

    fn find_metric(&self, security_id: i64, date: NaiveDate) -> Result<Option<SecurityMetric>, DomainError> {
        let conn = self.conn()?;
        let metric = conn
            .query_row(
                "SELECT security_id, date, market_cap, volume, average_volume, beta, last_dividend
                 FROM security_metrics WHERE security_id = ?1 AND date = ?2",
                params![security_id, fmt_date(date)],
                |row| {
                    let date_str: String = row.get(1)?;
                    Ok(SecurityMetric {
                        security_id: row.get(0)?,
                        date: parse_date_col(1, &date_str)?,
                        market_cap: row.get(2)?,
                        volume: row.get(3)?,
                        average_volume: row.get(4)?,
                        beta: row.get(5)?,
                        last_dividend: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(metric)
    }

    fn create_news_batch(&self, batch: &NewsSearchBatch) -> Result<i64, DomainError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO news_searches (subject, searched_at, combined_content) VALUES (?1, ?2, ?3)",
            params![batch.subject, fmt_instant(batch.searched_at), batch.combined_content],
        )
        .map_err(|e| DomainError::Database(format!("Failed to create news search: {e}")))?;
        let batch_id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO news_items (news_search_id, query, title, url, content, score)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for item in &batch.items {
                stmt.execute(params![batch_id, item.query, item.title, item.url, item.content, item.score])
                    .map_err(|e| DomainError::Database(format!("Failed to create news item: {e}")))?;
            }
        }
        tx.commit()?;
        Ok(batch_id)
    }

    fn find_latest_news_batch(&self, subject: &str) -> Result<Option<NewsSearchBatch>, DomainError> {
        let conn = self.conn()?;
        let head = conn
            .query_row(
                "SELECT id, subject, searched_at, combined_content FROM news_searches
                 WHERE subject = ?1 ORDER BY searched_at DESC, id DESC LIMIT 1",
                params![subject],
                |row| {
                    let id: i64 = row.get(0)?;
                    let subject: String = row.get(1)?;
                    let searched_str: String = row.get(2)?;
                    let combined: String = row.get(3)?;
                    Ok((id, subject, searched_str, combined))
                },
            )
            .optional()?;

        let Some((id, subject, searched_str, combined_content)) = head else {
            return Ok(None);
        };
        let searched_at = DateTime::parse_from_rfc3339(&searched_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DomainError::Database(format!("Bad searched_at '{searched_str}': {e}")))?;

        let mut stmt = conn.prepare(
            "SELECT query, title, url, content, score FROM news_items WHERE news_search_id = ?1 ORDER BY id ASC",
        )?;
        let items = stmt
            .query_map(params![id], |row| {
                Ok(NewsItem {
                    query: row.get(0)?,
                    title: row.get(1)?,
                    url: row.get(2)?,
                    content: row.get(3)?,
                    score: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(NewsSearchBatch {
            id: Some(id),
            subject,
            searched_at,
            combined_content,
            items,
        }))
    }

    fn delete_news_batches_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        let conn = self.conn()?;
        let removed = conn
            .execute(
                "DELETE FROM news_searches WHERE searched_at < ?1",
                params![fmt_instant(cutoff)],
            )
            .map_err(|e| DomainError::Database(format!("Failed to prune news: {e}")))?;
        Ok(removed)
    }
}
