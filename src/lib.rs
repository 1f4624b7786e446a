pub mod app;
pub mod categories;
pub mod config;
pub mod constants;
pub mod error;
pub mod infra;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod storage;
pub mod templates;
pub mod types;
