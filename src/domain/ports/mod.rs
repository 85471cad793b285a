pub mod market_data;
pub mod market_repository;
pub mod search_provider;
pub mod social_publisher;
pub mod text_generator;
