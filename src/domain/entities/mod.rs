pub mod daily_ranking;
pub mod market_snapshot;
pub mod news_search;
pub mod security;
pub mod security_metric;
