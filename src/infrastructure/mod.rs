pub mod feeds;
pub mod generation;
pub mod publish;
pub mod search;
pub mod sqlite;
