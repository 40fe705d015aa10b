use serde::{Deserialize, Serialize};

pub const DEFAULT_COMPANY_PERCENTAGE: f64 = 1.2;
pub const DEFAULT_FIXED_FEE: f64 = 50.0;

/// Global markup turning an instructor's net rate into a customer price.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    pub company_percentage: f64,
    pub fixed_fee: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            company_percentage: DEFAULT_COMPANY_PERCENTAGE,
            fixed_fee: DEFAULT_FIXED_FEE,
        }
    }
}

/// How an instructor override becomes the price the customer pays.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PricingPolicy {
    /// The net rate is shown as-is (creative-writing booking flow).
    Net,
    /// `net * companyPercentage + fixedFee` (service marketplace, admin review).
    Markup,
}

impl std::str::FromStr for PricingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "net" => Ok(PricingPolicy::Net),
            "markup" => Ok(PricingPolicy::Markup),
            other => Err(format!("unknown pricing policy: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn single(price: f64) -> Self {
        Self {
            min: price,
            max: price,
        }
    }
}
