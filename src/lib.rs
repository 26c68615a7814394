pub mod http_client;
pub mod pipeline;
pub mod rating_cache;
pub mod ratings_db;
pub mod role_params;
pub mod roster;
pub mod scoring;
pub mod season;
pub mod stat_fetch;
pub mod stat_normalize;
