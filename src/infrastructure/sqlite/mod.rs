pub mod market_repo;
pub mod migrations;
