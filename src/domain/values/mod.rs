pub mod category;
pub mod market_date;
pub mod normalize;
pub mod post;
