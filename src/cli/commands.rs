use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "moverwatch", about = "Daily US market movers: ingest, enrich, analyse and post")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the daily pipeline: ingest movers, enrich gainers, analyse the top five
    Sync,
    /// Fetch and store the movers snapshot only
    Ingest,
    /// Top five gainers of the most recent stored date
    Latest,
    /// Leaderboard for one date
    Rankings {
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Category (gainers, losers, active)
        #[arg(long, default_value = "gainers")]
        category: String,
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// Every ranking a ticker has held, newest first
    History { ticker: String },
    /// Fetch and store the profile and today's metrics of an ingested ticker
    Enrich { ticker: String },
    /// Generate AI analysis for the top five gainers
    Analyze {
        /// Date (YYYY-MM-DD); defaults to the latest stored date
        #[arg(long)]
        date: Option<String>,
    },
    /// Search news for one or more subjects concurrently and store the results
    News {
        #[arg(required = true)]
        subjects: Vec<String>,
        /// Query set (movement, company)
        #[arg(long, default_value = "company", conflicts_with = "query")]
        mode: String,
        /// Custom query; repeat for several. Use {subject} as a placeholder.
        #[arg(long)]
        query: Vec<String>,
    },
    /// Show the most recent stored news batch for a subject
    NewsShow { subject: String },
    /// Delete stored news older than N days
    NewsPrune {
        #[arg(long, default_value = "30")]
        days: u32,
    },
    /// Publish posts (ranking, analysis, all)
    Post {
        kind: String,
        /// Date (YYYY-MM-DD); defaults to the latest stored date
        #[arg(long)]
        date: Option<String>,
        /// Post a single analysis for this rank (1-5)
        #[arg(long)]
        rank: Option<u32>,
        /// Print the post text instead of publishing
        #[arg(long)]
        preview: bool,
    },
}
