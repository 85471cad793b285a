pub mod alphavantage;
pub mod fmp;
