//! Configuration loading, types, and validation

pub mod parser;
pub mod types;
pub mod validation;

pub use parser::load_config;
pub use types::{Config, RequestConfig, ScoreWeights, SitemapConfig, Thresholds};
pub use validation::validate;
