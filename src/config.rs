use std::env;
use std::path::PathBuf;

const DEFAULT_BASE_URL: &str = "https://www.immoweb.be/en/search/house-and-apartment/for-sale";

pub struct Config {
    pub base_url: String,
    pub start_page: u32,
    pub end_page: u32,
    pub max_workers: usize,
    pub delay_ms: u64,
    pub links_path: PathBuf,
    pub output_path: PathBuf,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            base_url: env_or("IMMOWEB_BASE_URL", DEFAULT_BASE_URL),
            start_page: env_or("START_PAGE", "1").parse()?,
            end_page: env_or("END_PAGE", "1").parse()?,
            max_workers: env_or("MAX_WORKERS", "5").parse()?,
            delay_ms: env_or("DELAY_MS", "0").parse()?,
            links_path: env_or("LINKS_PATH", "data/links.csv").into(),
            output_path: env_or("OUTPUT_PATH", "data/housing_market_data.csv").into(),
        })
    }
}
