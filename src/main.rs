use clap::Parser;
use moverwatch::application::news_fanout::NewsQueryMode;
use moverwatch::application::publish::PostKind;
use moverwatch::cli::commands::{Cli, Commands};
use moverwatch::config::AppConfig;
use moverwatch::domain::error::DomainError;
use moverwatch::domain::values::category::RankingCategory;
use moverwatch::domain::values::post::RANK_GLYPHS;
use moverwatch::MoverWatch;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("moverwatch=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    let mw = match MoverWatch::new(&config) {
        Ok(mw) => mw,
        Err(e) => {
            eprintln!("Error initializing moverwatch: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(mw, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(if e.is_caller_error() { 2 } else { 1 });
    }
}

async fn run_command(mw: MoverWatch, cmd: Commands) -> Result<(), DomainError> {
    match cmd {
        Commands::Sync => print_json(&mw.sync().await?)?,
        Commands::Ingest => print_json(&mw.ingest().await?)?,
        Commands::Latest => print_json(&mw.latest()?)?,
        Commands::Rankings { date, category, limit } => {
            let date = parse_date(&date)?;
            let category: RankingCategory = category.parse().map_err(DomainError::InvalidInput)?;
            print_json(&mw.rankings(date, category, limit)?)?;
        }
        Commands::History { ticker } => print_json(&mw.history(&ticker)?)?,
        Commands::Enrich { ticker } => print_json(&mw.enrich(&ticker).await?)?,
        Commands::Analyze { date } => {
            let date = date.as_deref().map(parse_date).transpose()?;
            print_json(&mw.analyze(date).await?)?;
        }
        Commands::News { subjects, mode, query } => {
            let mode = if query.is_empty() {
                mode.parse::<NewsQueryMode>().map_err(DomainError::InvalidInput)?
            } else {
                NewsQueryMode::Custom(query)
            };
            if let [subject] = subjects.as_slice() {
                print_json(&mw.news(subject, &mode).await?)?;
            } else {
                print_json(&mw.news_many(subjects, mode).await?)?;
            }
        }
        Commands::NewsShow { subject } => print_json(&mw.latest_news(&subject)?)?,
        Commands::NewsPrune { days } => {
            let removed = mw.prune_news(days)?;
            println!("Deleted {removed} news batches older than {days} days");
        }
        Commands::Post {
            kind,
            date,
            rank,
            preview,
        } => {
            let kind: PostKind = kind.parse().map_err(DomainError::InvalidInput)?;
            let date = date.as_deref().map(parse_date).transpose()?;
            if preview {
                preview_posts(&mw, kind, date, rank)?;
            } else {
                print_json(&mw.post(kind, date, rank).await?)?;
            }
        }
    }
    Ok(())
}

/// Print post texts without publishing anything.
fn preview_posts(
    mw: &MoverWatch,
    kind: PostKind,
    date: Option<chrono::NaiveDate>,
    rank: Option<u32>,
) -> Result<(), DomainError> {
    let date = match date {
        Some(d) => d,
        None => mw.latest()?.date,
    };
    if matches!(kind, PostKind::Ranking | PostKind::All) {
        println!("{}\n", mw.compose_ranking_post(date)?);
    }
    if matches!(kind, PostKind::Analysis | PostKind::All) {
        let ranks: Vec<u32> = match rank {
            Some(r) => vec![r],
            None => (1..=RANK_GLYPHS.len() as u32).collect(),
        };
        for r in ranks {
            match mw.compose_analysis_post(date, r) {
                Ok(text) => println!("{text}\n"),
                Err(e) => eprintln!("#{r}: {e}"),
            }
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), DomainError> {
    let out = serde_json::to_string_pretty(value).map_err(|e| DomainError::Decode(e.to_string()))?;
    println!("{out}");
    Ok(())
}

fn parse_date(s: &str) -> Result<chrono::NaiveDate, DomainError> {
    chrono::NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::InvalidInput(format!("Invalid date: {s}. Use YYYY-MM-DD")))
}
