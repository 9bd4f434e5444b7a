pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod pipeline;
pub mod scoring;
pub mod scrapers;
pub mod storage;

pub use error::{Result, ScoutError};
