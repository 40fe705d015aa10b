use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::pricing::{PricingConfig, PricingPolicy, DEFAULT_COMPANY_PERCENTAGE, DEFAULT_FIXED_FEE};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const GEMINI_MODEL: &str = "gemini-2.5-flash";
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const WIZARD_TTL_MINUTES: u64 = 120;

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub pricing: PricingConfig,
    pub booking_policy: PricingPolicy,
    pub catalog_path: Option<PathBuf>,
    pub mock_latency: Duration,
    /// Booking wizards untouched for this long are dropped.
    pub wizard_ttl: Duration,
    pub ai: AiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            environment: "development".to_string(),
            pricing: PricingConfig::default(),
            booking_policy: PricingPolicy::Net,
            catalog_path: None,
            mock_latency: Duration::ZERO,
            wizard_ttl: Duration::from_secs(WIZARD_TTL_MINUTES * 60),
            ai: AiConfig {
                api_key: None,
                model: GEMINI_MODEL.to_string(),
                api_base: GEMINI_API_BASE.to_string(),
            },
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match non_empty(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring unparseable {}={:?}", key, raw);
                default
            }
        },
        None => default,
    }
}

impl AppConfig {
    /// Read configuration from the environment, falling back to defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = AppConfig::default();

        Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", defaults.port),
            environment: non_empty("RUST_ENV").unwrap_or(defaults.environment),
            pricing: PricingConfig {
                company_percentage: parse_or("COMPANY_PERCENTAGE", DEFAULT_COMPANY_PERCENTAGE),
                fixed_fee: parse_or("FIXED_FEE", DEFAULT_FIXED_FEE),
            },
            booking_policy: parse_or("BOOKING_PRICE_POLICY", defaults.booking_policy),
            catalog_path: non_empty("CATALOG_PATH").map(PathBuf::from),
            mock_latency: Duration::from_millis(parse_or("MOCK_LATENCY_MS", 0u64)),
            wizard_ttl: Duration::from_secs(
                parse_or("WIZARD_TTL_MINUTES", WIZARD_TTL_MINUTES).saturating_mul(60),
            ),
            ai: AiConfig {
                api_key: non_empty("GEMINI_API_KEY"),
                model: non_empty("GEMINI_MODEL").unwrap_or(defaults.ai.model),
                api_base: non_empty("GEMINI_API_BASE").unwrap_or(defaults.ai.api_base),
            },
        }
    }
}
